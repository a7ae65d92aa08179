use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HudPanelProps {
    pub gold: i64,
    pub wood: i64,
    pub gems: i64,
    pub user: String,
}

#[function_component(HudPanel)]
pub fn hud_panel(props: &HudPanelProps) -> Html {
    html! {<div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px 12px; font-size:14px; color:#e6edf3; display:flex; flex-direction:column; gap:4px;">
        <div>{format!("Gold: {}", props.gold)}</div>
        <div>{format!("Wood: {}", props.wood)}</div>
        <div>{format!("Gems: {}", props.gems)}</div>
        <div style="opacity:0.7; font-size:12px;">{format!("User: {}", props.user)}</div>
    </div>}
}
