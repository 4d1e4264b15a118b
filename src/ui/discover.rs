use leptos::*;
use tracing::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use crate::chat::{self, PendingReplies, SaveOutcome, TurnSelection};
use crate::liveness::Liveness;
use crate::models::ChatTurn;
use crate::router::{Route, use_navigator};
use crate::state::use_app_state;
use crate::transcript::Transcript;
use crate::ui::message_chat::MessageChat;
use crate::ui::widgets::{Dialog, Notice, NoticeBanner};

#[component]
pub fn DiscoverPage() -> impl IntoView {
    let app = use_app_state();
    let nav = use_navigator();
    let liveness = Liveness::for_view();
    let backend = store_value(app.backend());
    let store = store_value(app.store.clone());
    let display_name = app.preferences.display_name_or_default();
    let notice = Notice::new(app.config.notice_timeout_ms);

    let mut restored = Transcript::new(app.config.transcript_limit);
    if restored.restore(app.store.as_ref()) {
        debug!("restored {} chat turns", restored.len());
    }
    let transcript = create_rw_signal(restored);
    let pending = create_rw_signal(PendingReplies::default());
    let selection = create_rw_signal(TurnSelection::default());
    let saving = create_rw_signal(false);
    let save_result = create_rw_signal(None::<SaveOutcome>);

    create_effect(move |_| {
        transcript.with(|t| store.with_value(|store| t.persist(store.as_ref())));
    });

    let live_send = liveness.clone();
    let send = Callback::new(move |text: String| {
        let turn = ChatTurn::human(text, display_name.clone());
        transcript.update(|t| {
            t.append(turn.clone());
        });
        pending.update(PendingReplies::begin);

        let backend = backend.get_value();
        let liveness = live_send.clone();
        spawn_local(async move {
            let reply = chat::request_agent_turn(backend.as_ref(), &turn);
            let Some(result) = liveness.settle(reply).await else {
                return;
            };
            pending.update(PendingReplies::finish);
            match result {
                Ok(reply) => transcript.update(|t| {
                    t.append(reply);
                }),
                Err(err) => {
                    warn!("chat request failed: {err}");
                    notice.show(format!("The recipe assistant did not answer: {err}"));
                }
            }
        });
    });

    let select = Callback::new(move |index: usize| {
        transcript.with_untracked(|t| {
            selection.update(|s| {
                s.select(index, t);
            })
        });
    });

    let live_save = liveness.clone();
    let save_selected = Callback::new(move |()| {
        let turns = transcript.with_untracked(|t| selection.with_untracked(|s| s.selected_turns(t)));
        if turns.is_empty() || saving.get_untracked() {
            return;
        }
        saving.set(true);

        let backend = backend.get_value();
        let liveness = live_save.clone();
        spawn_local(async move {
            let save = chat::save_selection(backend.as_ref(), &turns);
            let Some(outcome) = liveness.settle(save).await else {
                return;
            };
            saving.set(false);
            selection.update(|s| s.apply(&outcome));
            save_result.set(Some(outcome));
        });
    });

    let header_actions = move || {
        if selection.with(TurnSelection::is_active) {
            view! {
                <button on:click=move |_| selection.update(TurnSelection::exit)>"Cancel"</button>
                <button
                    class="primary"
                    disabled=move || {
                        saving.get() || selection.with(|s| s.selected().is_none())
                    }
                    on:click=move |_| save_selected.call(())
                >
                    {move || if saving.get() { "Saving…" } else { "Save selected" }}
                </button>
            }
            .into_view()
        } else {
            view! {
                <button on:click=move |_| selection.update(TurnSelection::enter)>
                    "Save Recipe"
                </button>
            }
            .into_view()
        }
    };

    let result_body = move || {
        save_result.get().map(|outcome| {
            let status = if outcome.success { "result success" } else { "result failure" };
            let view_button = outcome.recipe_name.map(|name| {
                view! {
                    <button
                        class="primary"
                        on:click=move |_| {
                            save_result.set(None);
                            nav.navigate(Route::Recipe(name.clone()));
                        }
                    >
                        "View Recipe"
                    </button>
                }
            });
            view! {
                <p class=status>{outcome.message}</p>
                <div class="dialog-actions">
                    <button on:click=move |_| save_result.set(None)>"Close"</button>
                    {view_button}
                </div>
            }
        })
    };

    view! {
        <div class="page discover">
            <header class="page-header">
                <button class="back" on:click=move |_| nav.navigate(Route::Home)>
                    "← Back"
                </button>
                <h2>"Discover"</h2>
                <div class="actions">{header_actions}</div>
            </header>
            <NoticeBanner notice=notice />
            <Show when=move || selection.with(TurnSelection::is_active)>
                <p class="hint">"Pick the agent message that holds the recipe you want to keep."</p>
            </Show>
            <MessageChat
                turns=Signal::derive(move || transcript.with(|t| t.turns().to_vec()))
                waiting=Signal::derive(move || pending.with(PendingReplies::is_waiting))
                selectable=Signal::derive(move || selection.with(TurnSelection::is_active))
                selected=Signal::derive(move || selection.with(TurnSelection::selected))
                on_submit=send
                on_select=select
            />
            <Dialog
                open=Signal::derive(move || save_result.with(Option::is_some))
                on_close=Callback::new(move |_| save_result.set(None))
                title="Save Recipe"
            >
                {result_body}
            </Dialog>
        </div>
    }
}
