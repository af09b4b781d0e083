// Widget catalog - the templates a dashboard can instantiate
use super::widget::WidgetTemplate;

#[derive(Debug, Clone, Default)]
pub struct WidgetCatalog {
    templates: Vec<WidgetTemplate>,
}

impl WidgetCatalog {
    /// Later templates with an already-seen id are dropped.
    pub fn new(templates: Vec<WidgetTemplate>) -> Self {
        let mut unique: Vec<WidgetTemplate> = Vec::with_capacity(templates.len());
        for template in templates {
            if unique.iter().any(|t| t.id == template.id) {
                tracing::warn!("Duplicate widget template {}, keeping the first", template.id);
                continue;
            }
            unique.push(template);
        }
        Self { templates: unique }
    }

    pub fn get(&self, template_id: &str) -> Option<&WidgetTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn templates(&self) -> &[WidgetTemplate] {
        &self.templates
    }

    pub fn by_category(&self, category: &str) -> impl Iterator<Item = &WidgetTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }
}
