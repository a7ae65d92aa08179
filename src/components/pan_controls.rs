use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PanControlsProps {
    pub on_pan_left: Callback<()>,
    pub on_pan_right: Callback<()>,
    pub on_pan_up: Callback<()>,
    pub on_pan_down: Callback<()>,
    pub on_recenter: Callback<()>,
    pub on_open_settings: Callback<()>,
}

#[function_component(PanControls)]
pub fn pan_controls(props: &PanControlsProps) -> Html {
    let pl = {
        let cb = props.on_pan_left.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pr = {
        let cb = props.on_pan_right.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pu = {
        let cb = props.on_pan_up.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pd = {
        let cb = props.on_pan_down.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rc = {
        let cb = props.on_recenter.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let st = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        <button onclick={pl}> {"←"} </button>
        <button onclick={pu}> {"↑"} </button>
        <button onclick={pd}> {"↓"} </button>
        <button onclick={pr}> {"→"} </button>
        <span style="width:8px;"></span>
        <button onclick={rc}> {"Center"} </button>
        <button onclick={st}> {"Menu"} </button>
    </div>}
}
