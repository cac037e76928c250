use std::collections::HashMap;

use folio_shared::Language;

pub(crate) mod filters {
    #[askama::filter_fn]
    pub fn t(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let lang = askama::get_value::<String>(values, "lang")
            .map(|lang| lang.as_str())
            .unwrap_or("en");

        Ok(rust_i18n::t!(value, locale = lang).to_string())
    }
}

pub struct Template {
    lang: Language,
}

impl Template {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("lang", Box::new(self.lang.to_string()));

        template.render_with_values(&values)
    }

    pub fn render<T: askama::Template>(&self, template: T) -> anyhow::Result<String> {
        Ok(self.render_with_values(template)?)
    }
}
