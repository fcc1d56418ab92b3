//! Main module for the countdown preset generator using Yew.
//! Wires form state, the generate/copy actions and the hex converter panel.

use countdown_preset::hex::convert_hex_tokens;
use countdown_preset::{bytes_label, parse_form, FormValues};
use gloo_timers::callback::Timeout;
use log::{info, warn};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

mod clipboard;
mod components;
mod config;
mod hooks;

use clipboard::copy_text;
use components::{render_hex_results, LabeledInput, OutputPanel, TargetSelect};
use config::*;
use hooks::use_form_field;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Blocking browser alert; falls back to the console if the window refuses.
fn alert(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        warn!("alert failed ({:?}): {}", e, message);
    }
}

/// Route `log` records to the browser console.
fn init_log() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let _ = fern::Dispatch::new()
        .level(global_level)
        .level_for(env!("CARGO_CRATE_NAME"), my_code_level)
        .chain(fern::Output::call(|record| {
            let msg = record.args().to_string();
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg.into()),
                log::Level::Warn => web_sys::console::warn_1(&msg.into()),
                log::Level::Info => web_sys::console::info_1(&msg.into()),
                log::Level::Debug | log::Level::Trace => web_sys::console::log_1(&msg.into()),
            }
        }))
        .apply();
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring form state, actions and output.
#[function_component(App)]
fn app() -> Html {
    let preset_name = use_form_field(DEFAULT_PRESET_NAME);
    let group_name = use_form_field(DEFAULT_GROUP_NAME);
    let zone_id = use_form_field(DEFAULT_ZONE_ID);
    let status_id = use_form_field(DEFAULT_STATUS_ID);
    let start_seconds = use_form_field(DEFAULT_START_SECONDS);
    let sub_second_threshold = use_form_field(DEFAULT_SUB_SECOND_THRESHOLD);
    let overlay_v_offset = use_form_field(DEFAULT_V_OFFSET);
    let overlay_f_scale = use_form_field(DEFAULT_F_SCALE);
    let target = use_form_field(DEFAULT_TARGET);
    let hex_input = use_form_field("");

    let output = use_state(String::new);
    let error_message = use_state(|| None::<String>);
    let copy_label = use_state(|| COPY_LABEL.to_string());
    let copy_timer = use_mut_ref(|| None::<Timeout>);
    let textarea_ref = use_node_ref();

    // Reads every field at click time; a failure leaves the previous output in place.
    let generate = {
        let fields = [
            preset_name.clone(),
            group_name.clone(),
            zone_id.clone(),
            status_id.clone(),
            start_seconds.clone(),
            sub_second_threshold.clone(),
            overlay_v_offset.clone(),
            overlay_f_scale.clone(),
            target.clone(),
        ];
        let output = output.clone();
        let error_message = error_message.clone();
        Callback::from(move |_: ()| {
            let [
                preset_name,
                group_name,
                zone_id,
                status_id,
                start_seconds,
                sub_second_threshold,
                overlay_v_offset,
                overlay_f_scale,
                target,
            ] = &fields;
            let values = FormValues {
                preset_name: preset_name.value(),
                group_name: group_name.value(),
                zone_id: zone_id.value(),
                status_id: status_id.value(),
                start_seconds: start_seconds.value(),
                sub_second_threshold: sub_second_threshold.value(),
                overlay_v_offset: overlay_v_offset.value(),
                overlay_f_scale: overlay_f_scale.value(),
                target: target.value(),
            };

            let result = parse_form(&values)
                .map_err(|e| e.to_string())
                .and_then(|request| {
                    countdown_preset::generate(&request)
                        .map_err(|e| format!("Failed to encode preset: {}", e))
                });

            match result {
                Ok(text) => {
                    output.set(text);
                    error_message.set(None);
                }
                Err(msg) => {
                    warn!("Generate rejected: {}", msg);
                    alert(&msg);
                    error_message.set(Some(msg));
                }
            }
        })
    };

    // Generate once with the default values
    {
        let generate = generate.clone();
        use_effect_with((), move |_| {
            generate.emit(());
            || ()
        });
    }

    let on_copy = {
        let output = output.clone();
        let copy_label = copy_label.clone();
        let copy_timer = copy_timer.clone();
        let textarea_ref = textarea_ref.clone();
        Callback::from(move |_: MouseEvent| {
            // Keep the text selected so a failed copy can be finished by hand
            if let Some(area) = textarea_ref.cast::<HtmlTextAreaElement>() {
                area.select();
                let len = area.value().encode_utf16().count() as u32;
                let _ = area.set_selection_range(0, len);
            }

            let text = (*output).clone();
            let copy_label = copy_label.clone();
            let copy_timer = copy_timer.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match copy_text(&text).await {
                    Ok(()) => {
                        copy_label.set(COPIED_LABEL.to_string());
                        let reset = copy_label.clone();
                        *copy_timer.borrow_mut() = Some(Timeout::new(COPY_FEEDBACK_MS, move || {
                            reset.set(COPY_LABEL.to_string());
                        }));
                    }
                    Err(e) => {
                        warn!("Clipboard write failed: {}", e);
                        alert(COPY_FAILED_MESSAGE);
                    }
                }
            });
        })
    };

    let hex_results = use_memo(hex_input.value(), |text| convert_hex_tokens(text));
    let bytes = if output.is_empty() {
        String::new()
    } else {
        bytes_label(&output)
    };

    html! {
        <div class="container">
            <h1>{ "Countdown Preset Generator" }</h1>

            <section class="card">
                <div class="form-row">
                    <LabeledInput id="presetName" label="Preset name:" value={preset_name.value()}
                        oninput={preset_name.on_input.clone()} />
                    <LabeledInput id="groupName" label="Group name:" value={group_name.value()}
                        oninput={group_name.on_input.clone()} />
                </div>
                <div class="form-row">
                    <LabeledInput id="zoneId" label="Zone ID:" input_type="number" value={zone_id.value()}
                        oninput={zone_id.on_input.clone()} />
                    <LabeledInput id="statusId" label="Status ID:" input_type="number" value={status_id.value()}
                        oninput={status_id.on_input.clone()} />
                </div>
                <div class="form-row">
                    <LabeledInput id="startSeconds" label="Start seconds:" input_type="number"
                        min="1" step="1" value={start_seconds.value()}
                        oninput={start_seconds.on_input.clone()} />
                    <LabeledInput id="subSecondThreshold" label="Tenths below (s, 0 = off):" input_type="number"
                        min="0" step="1" placeholder="0" value={sub_second_threshold.value()}
                        oninput={sub_second_threshold.on_input.clone()} />
                </div>
                <div class="form-row">
                    <LabeledInput id="overlayVOffset" label="overlayVOffset:" input_type="number"
                        step="0.1" value={overlay_v_offset.value()}
                        oninput={overlay_v_offset.on_input.clone()} />
                    <LabeledInput id="overlayFScale" label="overlayFScale:" input_type="number"
                        step="0.1" value={overlay_f_scale.value()}
                        oninput={overlay_f_scale.on_input.clone()} />
                </div>
                <TargetSelect value={target.value()} onchange={target.on_select.clone()} />

                <button id="btn-generate" class="btn-primary" onclick={generate.reform(|_: MouseEvent| ())}>
                    { "Generate" }
                </button>
                if let Some(ref err) = *error_message {
                    <div class="input-error">{ err }</div>
                }

                <OutputPanel
                    output={(*output).clone()}
                    bytes={bytes}
                    copy_label={(*copy_label).clone()}
                    copy_enabled={!output.is_empty()}
                    textarea_ref={textarea_ref.clone()}
                    oncopy={on_copy}
                />
            </section>

            <section class="card">
                <h2>{ "Hex → Decimal" }</h2>
                <LabeledInput id="hex-input" label="Hex values:" placeholder="0x1F, #2A FF"
                    value={hex_input.value()} oninput={hex_input.on_input.clone()} />
                { render_hex_results(&hex_results) }
            </section>
        </div>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    init_log();
    info!("Starting countdown preset generator");
    yew::Renderer::<App>::new().render();
}
