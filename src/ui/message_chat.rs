use leptos::*;

use crate::content::render_markdown;
use crate::models::ChatTurn;

fn bubble_class(is_agent: bool, selected: bool) -> &'static str {
    match (is_agent, selected) {
        (true, true) => "chat-bubble agent selected",
        (true, false) => "chat-bubble agent",
        (false, _) => "chat-bubble human",
    }
}

/// Transcript display plus the message input. The input stays usable while
/// replies are outstanding.
#[component]
pub fn MessageChat(
    #[prop(into)] turns: Signal<Vec<ChatTurn>>,
    #[prop(into)] waiting: Signal<bool>,
    #[prop(into)] selectable: Signal<bool>,
    #[prop(into)] selected: Signal<Option<usize>>,
    on_submit: Callback<String>,
    on_select: Callback<usize>,
) -> impl IntoView {
    let draft = create_rw_signal(String::new());
    let end_of_messages = create_node_ref::<html::Div>();

    create_effect(move |_| {
        turns.track();
        waiting.track();
        if let Some(anchor) = end_of_messages.get() {
            anchor.scroll_into_view();
        }
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get_untracked().trim().to_string();
        if text.is_empty() {
            return;
        }
        on_submit.call(text);
        draft.set(String::new());
    };

    let rows = move || turns.get().into_iter().enumerate().collect::<Vec<_>>();

    view! {
        <div class="chat">
            <div class="chat-messages">
                <For
                    each=rows
                    key=|(index, _)| *index
                    children=move |(index, turn)| {
                        let is_agent = turn.is_agent();
                        let row_class = if is_agent { "chat-row agent" } else { "chat-row human" };
                        let html = render_markdown(&turn.text);
                        let author = turn.user.name;
                        let is_selected = move || selected.get() == Some(index);
                        view! {
                            <div class=row_class>
                                <Show when=move || is_agent && selectable.get()>
                                    <input
                                        type="radio"
                                        name="select-agent-msg"
                                        prop:checked=is_selected
                                        on:change=move |_| on_select.call(index)
                                    />
                                </Show>
                                <div
                                    class=move || bubble_class(is_agent, is_selected())
                                    on:click=move |_| {
                                        if is_agent {
                                            on_select.call(index);
                                        }
                                    }
                                >
                                    <span class="chat-author">{author}</span>
                                    <div class="chat-text" inner_html=html></div>
                                </div>
                            </div>
                        }
                    }
                />
                <Show when=move || waiting.get()>
                    <div class="chat-row agent typing">
                        <div class="chat-bubble agent">"Agent is typing…"</div>
                    </div>
                </Show>
                <div class="chat-end" node_ref=end_of_messages></div>
            </div>
            <form class="chat-input" on:submit=submit>
                <input
                    type="text"
                    placeholder="Ask for dinner ideas…"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                />
                <button type="submit" class="primary">
                    "Send"
                </button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_agent_bubbles_show_selection() {
        assert_eq!(bubble_class(true, true), "chat-bubble agent selected");
        assert_eq!(bubble_class(false, true), "chat-bubble human");
        assert_eq!(bubble_class(true, false), "chat-bubble agent");
    }
}
