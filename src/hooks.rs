use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Raw text of one form control plus the callbacks that keep it current.
#[derive(Clone)]
pub struct FormField {
    /// The current text content of the control.
    pub text: UseStateHandle<String>,
    /// `oninput` handler for `<input>` elements.
    pub on_input: Callback<InputEvent>,
    /// `onchange` handler for `<select>` elements.
    pub on_select: Callback<Event>,
}

impl FormField {
    pub fn value(&self) -> String {
        (*self.text).clone()
    }
}

/// Custom hook holding the unparsed text of a form control.
///
/// Parsing happens only when the form is submitted, so the text is kept as typed.
#[hook]
pub fn use_form_field(initial: &'static str) -> FormField {
    let text = use_state(|| initial.to_string());

    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let on_select = {
        let text = text.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            text.set(select.value());
        })
    };

    FormField {
        text,
        on_input,
        on_select,
    }
}
