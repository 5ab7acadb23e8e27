//! Expandable trial detail panel: parameters, logs and model visualization.

use leptos::prelude::*;
use lucide_leptos::{ExternalLink, TriangleAlert, X};

use trialview_core::panel::{
    log_path_link, LinkButton, LogView, ParameterView, Tab, TextPanel, VisualizationView,
};
use trialview_core::params::{TreeNode, TreeValue};
use trialview_core::{MessageKind, PanelConfig, StatusMessage, TransientMessage, TrialPanel};

use crate::browser::{open_in_new_tab, BrowserClipboard, TimeoutScheduler};

type Notifier = StoredValue<TransientMessage<TimeoutScheduler>, LocalStorage>;

const PRIMARY_BUTTON: &str = "inline-flex items-center space-x-2 px-4 py-2 bg-blue-600 hover:bg-blue-500 text-white text-sm font-medium rounded-lg transition-colors";
const SECONDARY_BUTTON: &str = "px-4 py-2 bg-slate-800 hover:bg-slate-700 border border-slate-700 text-slate-200 text-sm font-medium rounded-lg transition-colors";

#[component]
pub fn TrialDetailPanel(panel: TrialPanel, config: PanelConfig) -> impl IntoView {
    let tabs = panel.tabs();
    let (active_tab, set_active_tab) = signal(Tab::Parameters);

    // Copy feedback; the pending hide is cancelled when the panel unmounts.
    let message = RwSignal::new(None::<StatusMessage>);
    let notifier: Notifier = StoredValue::new_local(TransientMessage::new(
        TimeoutScheduler,
        config.message_timeout(),
        move |m| message.set(m),
    ));

    let TrialPanel {
        parameters,
        log,
        visualization,
        ..
    } = panel;

    view! {
        <div class="bg-slate-900 border border-slate-800 rounded-xl overflow-hidden">
            <div class="flex border-b border-slate-800 bg-slate-950/50">
                {tabs.into_iter().map(|tab| view! {
                    <button
                        on:click=move |_| {
                            if tab != active_tab.get_untracked() {
                                // the copy message belongs to the tab being left
                                notifier.update_value(|n| n.dismiss());
                            }
                            set_active_tab.set(tab);
                        }
                        class=move || format!(
                            "px-5 py-3 text-sm font-medium transition-colors {}",
                            if active_tab.get() == tab {
                                "text-blue-400 border-b-2 border-blue-500"
                            } else {
                                "text-slate-400 hover:text-white"
                            }
                        )
                    >
                        {tab.label()}
                    </button>
                }).collect_view()}
            </div>
            <div class="p-6">
                {move || match active_tab.get() {
                    Tab::Parameters => view! {
                        <ParametersTab parameters=parameters.clone() message=message notifier=notifier />
                    }.into_any(),
                    Tab::Log => view! { <LogTab log=log.clone() /> }.into_any(),
                    Tab::Visualization => match visualization.clone() {
                        Some(visualization) => view! { <VisualizationTab visualization=visualization /> }.into_any(),
                        None => view! { <div></div> }.into_any(),
                    },
                }}
            </div>
        </div>
    }
}

// ─── Parameters ──────────────────────────────────────────────────────────────

#[component]
fn ParametersTab(
    parameters: ParameterView,
    message: RwSignal<Option<StatusMessage>>,
    notifier: Notifier,
) -> impl IntoView {
    let details = match parameters {
        ParameterView::Available(details) => details,
        ParameterView::Unavailable { message: text } => {
            return view! {
                <div class="flex items-center space-x-2 text-sm">
                    <span class="text-red-400"><TriangleAlert size=16 /></span>
                    <span class="font-semibold text-slate-300">"Error: "</span>
                    <span class="text-red-400">{text}</span>
                </div>
            }
            .into_any();
        }
    };

    let tree = details.tree().to_vec();
    let viewer = RwSignal::new(details.original_viewer());
    let has_original = viewer.with_untracked(|v| v.is_offered());

    let on_copy = move |_| {
        let status = details.copy_to(&mut BrowserClipboard);
        log::debug!("copy parameters: {}", status.kind.as_str());
        notifier.update_value(|n| n.show(status));
    };
    let close_original = Callback::new(move |_: ()| viewer.update(|v| v.close()));

    view! {
        <div class="space-y-4">
            <div class="bg-slate-950 border border-slate-800 rounded-lg p-4 font-mono text-xs overflow-auto max-h-96">
                <JsonTree rows=tree />
            </div>
            <div class="flex items-center space-x-3">
                <button on:click=on_copy class=PRIMARY_BUTTON>"Copy as json"</button>
                {has_original.then(|| view! {
                    <button on:click=move |_| viewer.update(|v| v.open()) class=SECONDARY_BUTTON>
                        "Original parameters"
                    </button>
                })}
                {move || message.get().map(|m| view! { <MessageInfo message=m /> })}
            </div>
            {move || {
                viewer
                    .with(|v| v.visible().cloned())
                    .map(|panel| view! { <CodePanel panel=panel on_close=close_original /> })
            }}
        </div>
    }
    .into_any()
}

/// Fully expanded JSON tree without the root or item counts.
#[component]
fn JsonTree(rows: Vec<TreeNode>) -> impl IntoView {
    rows.into_iter()
        .map(|row| {
            let indent = format!("padding-left: {}rem", row.depth as f32 * 1.25);
            let key = (!row.key.is_empty()).then(|| view! {
                <span class="text-blue-300">{row.key}":"</span>
            });
            let value = match row.value {
                TreeValue::Branch => None,
                TreeValue::Leaf(text) => Some(view! { <span class="ml-2 text-emerald-300">{text}</span> }),
            };
            view! { <div style=indent class="py-0.5">{key}{value}</div> }
        })
        .collect_view()
}

#[component]
fn MessageInfo(message: StatusMessage) -> impl IntoView {
    let tone = match message.kind {
        MessageKind::Success => "text-emerald-300 bg-emerald-500/10 border-emerald-500/30",
        MessageKind::Error => "text-red-300 bg-red-500/10 border-red-500/30",
    };
    view! {
        <div class=format!("px-3 py-1.5 rounded-lg text-xs border {}", tone)>{message.text}</div>
    }
}

/// Side panel showing read-only text, e.g. the original parameters.
#[component]
fn CodePanel(panel: TextPanel, on_close: Callback<()>) -> impl IntoView {
    view! {
        <div class="fixed inset-0 z-50 flex justify-end bg-black/60">
            <div class="w-full max-w-2xl h-full bg-slate-900 border-l border-slate-800 flex flex-col">
                <div class="flex items-center justify-between p-4 border-b border-slate-800">
                    <h3 class="text-lg font-semibold text-white">{panel.title}</h3>
                    <button on:click=move |_| on_close.run(()) class="text-slate-400 hover:text-white">
                        <X size=18 />
                    </button>
                </div>
                <pre class="flex-grow overflow-auto p-4 text-xs font-mono text-slate-200 whitespace-pre">
                    {panel.content}
                </pre>
                <div class="p-4 border-t border-slate-800 flex justify-end">
                    <button on:click=move |_| on_close.run(()) class=SECONDARY_BUTTON>"Close"</button>
                </div>
            </div>
        </div>
    }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

#[component]
fn LogTab(log: LogView) -> impl IntoView {
    match log {
        LogView::Files {
            log_path,
            buttons,
            tracking,
        } => view! {
            <div class="space-y-4">
                <LogPathRow log_path=log_path />
                <div class="flex flex-wrap gap-3">
                    {buttons
                        .into_iter()
                        .chain(tracking)
                        .map(|button| view! { <OpenButton button=button /> })
                        .collect_view()}
                </div>
            </div>
        }
        .into_any(),
        LogView::Delegated { log_path } => view! { <DelegatedLog log_path=log_path /> }.into_any(),
    }
}

#[component]
fn LogPathRow(log_path: String) -> impl IntoView {
    view! {
        <div class="text-sm">
            <span class="font-semibold text-slate-300 mr-2">"LogPath:"</span>
            <span class="font-mono text-slate-400 break-all">{log_path}</span>
        </div>
    }
}

/// Log view for training services that host trial logs themselves.
#[component]
fn DelegatedLog(log_path: String) -> impl IntoView {
    let link = log_path_link(&log_path).map(str::to_string);
    view! {
        <div class="space-y-3">
            <LogPathRow log_path=log_path />
            {link.map(|href| view! {
                <a href=href target="_blank" class="inline-flex items-center space-x-1 text-sm text-blue-400 hover:underline">
                    <span>"Open trial log"</span>
                    <ExternalLink size=14 />
                </a>
            })}
        </div>
    }
}

#[component]
fn OpenButton(button: LinkButton) -> impl IntoView {
    let url = button.url;
    view! {
        <button on:click=move |_| open_in_new_tab(&url) class=PRIMARY_BUTTON>
            <span>{button.label}</span>
            <ExternalLink size=14 />
        </button>
    }
}

// ─── Visualization ───────────────────────────────────────────────────────────

#[component]
fn VisualizationTab(visualization: VisualizationView) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-4">
            <span class="text-sm text-slate-400">{visualization.text}</span>
            <OpenButton button=visualization.button />
        </div>
    }
}
