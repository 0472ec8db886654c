use field_core::OverlayContent;
use web_sys as web;

/// The small readout layered over the canvas.
pub struct OverlayView {
    el: web::Element,
}

impl OverlayView {
    pub fn create(document: &web::Document) -> anyhow::Result<Self> {
        let el = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        el.set_class_name("decision-field-overlay");
        let _ = el.set_attribute("aria-hidden", "true");
        let view = Self { el };
        view.hide();
        Ok(view)
    }

    #[inline]
    pub fn element(&self) -> &web::Element {
        &self.el
    }

    pub fn hide(&self) {
        let _ = self.el.class_list().add_1("hidden");
        let _ = self.el.set_attribute("style", "display:none");
        self.el.set_text_content(None);
    }

    pub fn show(&self, content: &OverlayContent) {
        let OverlayContent::Lines(lines) = content else {
            self.hide();
            return;
        };
        self.el.set_text_content(None);
        if let Some(document) = self.el.owner_document() {
            for line in lines {
                if let Ok(span) = document.create_element("span") {
                    span.set_text_content(Some(line));
                    let _ = self.el.append_child(&span);
                }
            }
        }
        let _ = self.el.class_list().remove_1("hidden");
        let _ = self.el.set_attribute("style", "");
    }
}
