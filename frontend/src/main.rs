use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::hooks::use_params_map;
use leptos_router::path;
use lucide_leptos::{ChevronDown, ChevronRight, FlaskConical, Package, TriangleAlert};

use trialview_core::{
    ExperimentContext, ExperimentProfile, PanelConfig, Trial, TrialPanel, TrialStatus, TrialTable,
};

mod api;
mod browser;
mod trial_panel;

use trial_panel::TrialDetailPanel;

fn format_date(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%H:%M, %d %b, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn status_tone(status: TrialStatus) -> (&'static str, &'static str) {
    match status {
        TrialStatus::Running => ("text-blue-400", "bg-blue-500"),
        TrialStatus::Succeeded => ("text-emerald-400", "bg-emerald-500"),
        TrialStatus::Failed => ("text-red-400", "bg-red-500"),
        TrialStatus::Waiting
        | TrialStatus::Unknown
        | TrialStatus::UserCanceled
        | TrialStatus::SysCanceled
        | TrialStatus::EarlyStopped => ("text-slate-400", "bg-slate-600"),
    }
}

async fn load_dashboard(base: String) -> Result<(ExperimentProfile, Vec<Trial>), String> {
    let experiment = api::fetch_experiment(base.clone()).await?;
    let trials = api::fetch_trials(base).await?;
    Ok((experiment, trials))
}

#[component]
fn App() -> impl IntoView {
    provide_context(PanelConfig::default());

    view! {
        <Router>
            <div class="flex h-screen bg-slate-950 text-slate-100 font-sans">
                <nav class="w-64 border-r border-slate-800 flex flex-col p-4 bg-slate-900/50">
                    <div class="flex items-center space-x-3 px-2 py-6 mb-6">
                        <div class="p-2 bg-blue-600 rounded-lg shadow-lg shadow-blue-900/20">
                            <Package size=24 />
                        </div>
                        <span class="text-2xl font-bold tracking-tight text-white">"TrialView"</span>
                    </div>

                    <A href="/" attr:class="flex items-center space-x-3 px-4 py-3 rounded-xl hover:bg-slate-800 transition-all duration-200 text-slate-400 hover:text-white group">
                        <div class="group-hover:text-blue-400 transition-colors">
                            <FlaskConical size=20 />
                        </div>
                        <span class="font-medium">"Trials"</span>
                    </A>
                </nav>

                <main class="flex-grow overflow-auto p-8">
                    <Routes fallback=|| view! { <NotFound /> }.into_any()>
                        <Route path=path!("/") view=|| view! { <TrialsPage /> } />
                        <Route path=path!("/trials/:id") view=|| view! { <TrialPage /> } />
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_any()
}

#[component]
fn TrialsPage() -> impl IntoView {
    let config = use_context::<PanelConfig>().unwrap_or_default();
    let base = config.backend_base.clone();
    let data = LocalResource::new(move || load_dashboard(base.clone()));
    let (expanded, set_expanded) = signal(HashSet::<String>::new());

    let toggle = move |id: String| {
        set_expanded.update(|set| {
            if !set.remove(&id) {
                set.insert(id);
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold text-white">"Trial jobs"</h1>
            <Suspense fallback=|| view! { <div class="p-4 text-center text-slate-500">"Loading trials..."</div> }>
                {move || {
                    let config = config.clone();
                    Suspend::new(async move {
                        let (profile, trials) = match data.await {
                            Ok(loaded) => loaded,
                            Err(e) => return view! { <LoadError message=e /> }.into_any(),
                        };
                        if trials.is_empty() {
                            return view! { <div class="p-12 text-center text-slate-500">"No trials found for this experiment."</div> }.into_any();
                        }
                        let experiment = ExperimentContext::from(&profile);

                        view! {
                            <div class="bg-slate-900 border border-slate-800 rounded-xl overflow-hidden">
                                <table class="w-full text-left border-collapse">
                                    <thead class="bg-slate-950 text-xs uppercase text-slate-500 font-semibold">
                                        <tr>
                                            <th class="p-4 border-b border-slate-800 w-10"></th>
                                            <th class="p-4 border-b border-slate-800">"Trial No."</th>
                                            <th class="p-4 border-b border-slate-800">"ID"</th>
                                            <th class="p-4 border-b border-slate-800">"Status"</th>
                                            <th class="p-4 border-b border-slate-800">"Duration"</th>
                                            <th class="p-4 border-b border-slate-800">"Started"</th>
                                        </tr>
                                    </thead>
                                    <tbody class="divide-y divide-slate-800/50 text-sm text-slate-300">
                                        {trials.into_iter().map(|trial| {
                                            let id = trial.id.clone();
                                            let id_for_toggle = id.clone();
                                            let id_for_check = id.clone();
                                            let is_open = Signal::derive(move || expanded.with(|s| s.contains(&id_for_check)));
                                            let (text_tone, dot_tone) = status_tone(trial.status);
                                            let duration = trial
                                                .duration_secs()
                                                .map(|d| format!("{:.1}s", d))
                                                .unwrap_or_else(|| "-".to_string());
                                            let panel = TrialPanel::build(&trial, &experiment, &config);
                                            let panel_config = config.clone();

                                            view! {
                                                <tr
                                                    class="hover:bg-slate-800/30 transition-colors cursor-pointer"
                                                    on:click=move |_| toggle(id_for_toggle.clone())
                                                >
                                                    <td class="p-4 text-slate-500">
                                                        {move || if is_open.get() {
                                                            view! { <ChevronDown size=16 /> }.into_any()
                                                        } else {
                                                            view! { <ChevronRight size=16 /> }.into_any()
                                                        }}
                                                    </td>
                                                    <td class="p-4 font-mono">{trial.sequence_id}</td>
                                                    <td class="p-4 font-mono">
                                                        <A href=format!("/trials/{}", id) attr:class="text-blue-400 hover:underline">{id.clone()}</A>
                                                    </td>
                                                    <td class="p-4">
                                                        <span class=format!("inline-flex items-center space-x-2 text-xs font-medium {}", text_tone)>
                                                            <span class=format!("w-2 h-2 rounded-full {}", dot_tone)></span>
                                                            <span>{trial.status.as_str()}</span>
                                                        </span>
                                                    </td>
                                                    <td class="p-4 font-mono text-slate-400">{duration}</td>
                                                    <td class="p-4 text-slate-400 whitespace-nowrap">{format_date(trial.start_time)}</td>
                                                </tr>
                                                {move || is_open.get().then(|| view! {
                                                    <tr>
                                                        <td colspan="6" class="p-4 bg-slate-950/40">
                                                            <TrialDetailPanel panel=panel.clone() config=panel_config.clone() />
                                                        </td>
                                                    </tr>
                                                })}
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        }
                        .into_any()
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn TrialPage() -> impl IntoView {
    let params = use_params_map();
    let id = move || params.read().get("id").unwrap_or_default();
    let config = use_context::<PanelConfig>().unwrap_or_default();
    let base = config.backend_base.clone();
    let data = LocalResource::new(move || load_dashboard(base.clone()));

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold text-white">"Trial " <span class="font-mono text-blue-400">{id}</span></h1>
            <Suspense fallback=|| view! { <div class="p-4 text-center text-slate-500">"Loading trial..."</div> }>
                {move || {
                    let config = config.clone();
                    let trial_id = id();
                    Suspend::new(async move {
                        let (profile, trials) = match data.await {
                            Ok(loaded) => loaded,
                            Err(e) => return view! { <LoadError message=e /> }.into_any(),
                        };
                        let table = TrialTable::new(trials);
                        let experiment = ExperimentContext::from(&profile);
                        match TrialPanel::for_trial(&table, &trial_id, &experiment, &config) {
                            Ok(panel) => view! { <TrialDetailPanel panel=panel config=config /> }.into_any(),
                            Err(e) => view! { <LoadError message=e.to_string() /> }.into_any(),
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn LoadError(message: String) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-3 p-4 bg-red-500/10 border border-red-500/30 rounded-xl text-red-300">
            <TriangleAlert size=20 />
            <span>{message}</span>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center h-full space-y-4 text-slate-500">
            <TriangleAlert size=48 />
            <h1 class="text-2xl font-bold">"404 - Not Found"</h1>
            <A href="/" attr:class="text-blue-400 hover:underline">"Back to trials"</A>
        </div>
    }
}

fn main() {
    let level = if browser::local_flag("debug_enabled") {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
