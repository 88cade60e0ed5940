use utopia_protocol::RenderCommand;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement, ScrollBehavior, ScrollToOptions, Window};

/// Apply render commands to the live document, in order.
///
/// Commands addressing elements the page does not contain are skipped.
pub fn apply_commands(window: &Window, document: &Document, commands: &[RenderCommand]) {
    for command in commands {
        if let Err(e) = apply(window, document, command) {
            web_sys::console::warn_1(&format!("utopia: failed to apply {command:?}: {e:?}").into());
        }
    }
}

fn element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn apply(window: &Window, document: &Document, command: &RenderCommand) -> Result<(), JsValue> {
    if let RenderCommand::ScrollTo { top, smooth } = command {
        let options = ScrollToOptions::new();
        options.set_top(*top);
        options.set_behavior(if *smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        });
        window.scroll_to_with_scroll_to_options(&options);
        return Ok(());
    }

    let Some(target) = command.target() else {
        return Ok(());
    };
    let Some(el) = element(document, target.dom_id()) else {
        return Ok(());
    };
    let style = el.style();

    match command {
        RenderCommand::SetTransform {
            transform,
            transition,
            ..
        } => {
            if let Some(transition) = transition {
                style.set_property("transition", transition)?;
            }
            style.set_property("transform", transform)?;
        }
        RenderCommand::SetOpacity { opacity, .. } => {
            style.set_property("opacity", &opacity.clamp(0.0, 1.0).to_string())?;
        }
        RenderCommand::SetVisible { visible, .. } => el.set_hidden(!*visible),
        RenderCommand::SetImageSource { src, .. } => {
            if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
                img.set_src(src);
            }
        }
        RenderCommand::SetMaxWidth { css, .. } => match css {
            Some(css) => {
                style.set_property("max-width", css)?;
                style.set_property("width", css)?;
            }
            None => {
                style.remove_property("max-width")?;
                style.remove_property("width")?;
            }
        },
        RenderCommand::ScrollTo { .. } => {}
    }
    Ok(())
}
