//! Yew view components for the preset generator UI.
//!
//! Most of these are stateless and render from props; `HexPill` keeps its own
//! copy-feedback state.

use crate::clipboard::copy_text;
use crate::config::{COPIED_LABEL, COPY_FEEDBACK_MS, HEX_EMPTY_HINT};
use countdown_preset::hex::HexConversion;
use countdown_preset::TargetSelection;
use gloo_timers::callback::Timeout;
use yew::prelude::*;

/// Labeled `<input>` bound to a text state.
#[derive(Properties, PartialEq)]
pub struct LabeledInputProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: AttrValue,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub step: Option<AttrValue>,
    #[prop_or_default]
    pub min: Option<AttrValue>,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    pub oninput: Callback<InputEvent>,
}

#[function_component(LabeledInput)]
pub fn labeled_input(props: &LabeledInputProps) -> Html {
    html! {
        <div class="form-group">
            <label for={props.id.clone()}>{ props.label.clone() }</label>
            <input
                id={props.id.clone()}
                type={props.input_type.clone()}
                step={props.step.clone()}
                min={props.min.clone()}
                placeholder={props.placeholder.clone()}
                value={props.value.clone()}
                oninput={props.oninput.clone()}
            />
        </div>
    }
}

/// Dropdown listing every target selection.
#[derive(Properties, PartialEq)]
pub struct TargetSelectProps {
    pub value: AttrValue,
    pub onchange: Callback<Event>,
}

#[function_component(TargetSelect)]
pub fn target_select(props: &TargetSelectProps) -> Html {
    html! {
        <div class="form-group">
            <label for="targetPlaceholder">{ "Target:" }</label>
            <select id="targetPlaceholder" onchange={props.onchange.clone()}>
                { TargetSelection::ALL.iter().map(|target| {
                    html! {
                        <option value={target.value()} selected={props.value.as_str() == target.value()}>
                            { target.label() }
                        </option>
                    }
                }).collect::<Html>() }
            </select>
        </div>
    }
}

/// Read-only output box with byte counter and copy button.
#[derive(Properties, PartialEq)]
pub struct OutputPanelProps {
    pub output: AttrValue,
    pub bytes: AttrValue,
    pub copy_label: AttrValue,
    pub copy_enabled: bool,
    pub textarea_ref: NodeRef,
    pub oncopy: Callback<MouseEvent>,
}

#[function_component(OutputPanel)]
pub fn output_panel(props: &OutputPanelProps) -> Html {
    html! {
        <div class="output-panel">
            <textarea
                id="minified"
                readonly={true}
                rows="6"
                ref={props.textarea_ref.clone()}
                value={props.output.clone()}
            />
            <div class="output-footer">
                <span class="bytes">{ props.bytes.clone() }</span>
                <button
                    id="btn-copy-min"
                    class="btn-secondary"
                    disabled={!props.copy_enabled}
                    onclick={props.oncopy.clone()}
                >
                    { props.copy_label.clone() }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HexPillProps {
    pub raw: AttrValue,
    pub decimal: AttrValue,
}

/// One conversion result; clicking copies the decimal value.
#[function_component(HexPill)]
pub fn hex_pill(props: &HexPillProps) -> Html {
    let copied = use_state(|| false);
    let feedback_timer = use_mut_ref(|| None::<Timeout>);

    let onclick = {
        let copied = copied.clone();
        let feedback_timer = feedback_timer.clone();
        let decimal = props.decimal.clone();
        Callback::from(move |_: MouseEvent| {
            let copied = copied.clone();
            let feedback_timer = feedback_timer.clone();
            let decimal = decimal.clone();
            wasm_bindgen_futures::spawn_local(async move {
                // Failures leave the pill unchanged
                if copy_text(&decimal).await.is_ok() {
                    copied.set(true);
                    let reset = copied.clone();
                    *feedback_timer.borrow_mut() =
                        Some(Timeout::new(COPY_FEEDBACK_MS, move || reset.set(false)));
                }
            });
        })
    };

    let prefix = if *copied {
        COPIED_LABEL.to_string()
    } else {
        format!("{} →", props.raw)
    };

    html! {
        <button type="button" class="hex-pill" title="Click to copy" {onclick}>
            <small>{ prefix }</small>
            { " " }
            { props.decimal.clone() }
        </button>
    }
}

/// Renders the list of hex conversion pills, or a hint when empty.
pub fn render_hex_results(results: &[HexConversion]) -> Html {
    // Early return for empty results
    if results.is_empty() {
        return html! {
            <div id="hex-results" class="hex-results">
                <div class="bytes">{ HEX_EMPTY_HINT }</div>
            </div>
        };
    }

    html! {
        <div id="hex-results" class="hex-results">
            { results.iter().enumerate().map(|(idx, r)| {
                html! {
                    <HexPill
                        key={format!("{}-{}", idx, r.raw)}
                        raw={r.raw.clone()}
                        decimal={r.decimal.clone()}
                    />
                }
            }).collect::<Html>() }
        </div>
    }
}
