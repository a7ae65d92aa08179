use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub api_base: String,
    pub user_id: String,
    pub on_close: Callback<()>,
    /// (api_base, user_id)
    pub on_save: Callback<(String, String)>,
    /// desired user id, empty for server-assigned
    pub on_new_game: Callback<String>,
    pub on_credit_gems: Callback<u64>,
    pub on_expand: Callback<u32>,
}

fn input_value(node: &NodeRef) -> String {
    node.cast::<HtmlInputElement>()
        .map(|el| el.value())
        .unwrap_or_default()
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    let api_ref = use_node_ref();
    let user_ref = use_node_ref();
    let gems_ref = use_node_ref();
    let steps_ref = use_node_ref();

    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let save_cb = {
        let cb = props.on_save.clone();
        let api_ref = api_ref.clone();
        let user_ref = user_ref.clone();
        Callback::from(move |_| {
            let api = input_value(&api_ref).trim().to_string();
            let user = input_value(&user_ref).trim().to_string();
            if !api.is_empty() && !user.is_empty() {
                cb.emit((api, user));
            }
        })
    };
    let new_game_cb = {
        let cb = props.on_new_game.clone();
        let user_ref = user_ref.clone();
        Callback::from(move |_| {
            if let Some(win) = web_sys::window() {
                if !win
                    .confirm_with_message("Start a new city? The current user id keeps its progress on the server.")
                    .unwrap_or(false)
                {
                    return;
                }
            }
            cb.emit(input_value(&user_ref).trim().to_string());
        })
    };
    let credit_cb = {
        let cb = props.on_credit_gems.clone();
        let gems_ref = gems_ref.clone();
        Callback::from(move |_| {
            if let Ok(gems) = input_value(&gems_ref).trim().parse::<u64>() {
                if gems > 0 {
                    cb.emit(gems);
                }
            }
        })
    };
    let expand_cb = {
        let cb = props.on_expand.clone();
        let steps_ref = steps_ref.clone();
        Callback::from(move |_| {
            if let Ok(steps) = input_value(&steps_ref).trim().parse::<u32>() {
                if steps > 0 {
                    cb.emit(steps);
                }
            }
        })
    };

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <label style="display:flex; flex-direction:column; gap:4px;">
                    <span style="font-size:12px; opacity:0.8;">{"API base"}</span>
                    <input ref={api_ref} type="text" value={props.api_base.clone()} />
                </label>
                <label style="display:flex; flex-direction:column; gap:4px;">
                    <span style="font-size:12px; opacity:0.8;">{"User id"}</span>
                    <input ref={user_ref} type="text" value={props.user_id.clone()} />
                </label>
                <div style="display:flex; gap:8px;">
                    <button onclick={save_cb} style="flex:1;">{"Save & Reload"}</button>
                    <button onclick={new_game_cb} style="flex:1;">{"New Game"}</button>
                </div>
            </div>
            <div style="display:flex; gap:8px; align-items:center;">
                <input ref={gems_ref} type="number" min="1" placeholder="gems" style="width:80px;" />
                <button onclick={credit_cb}>{"Buy Gems (dev)"}</button>
            </div>
            <div style="display:flex; gap:8px; align-items:center;">
                <input ref={steps_ref} type="number" min="1" placeholder="rings" style="width:80px;" />
                <button onclick={expand_cb}>{"Expand World (gems)"}</button>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"The server owns all balances and timers. Changing the user id switches cities without deleting anything."}</div>
        </div>
    </div>}
}
