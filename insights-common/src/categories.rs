use crate::tables::CategoryTranslations;

/// Turns raw category codes into display names: translate when possible, then
/// `underscores -> spaces` and title case.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryNames<'a> {
    translations: Option<&'a CategoryTranslations>,
}

impl<'a> CategoryNames<'a> {
    pub fn new(translations: Option<&'a CategoryTranslations>) -> Self {
        Self { translations }
    }

    pub fn display_name(&self, raw: &str) -> String {
        let name = self
            .translations
            .and_then(|t| t.english_name(raw))
            .unwrap_or(raw);
        prettify(name)
    }

    /// Distinct display names in first-seen order.
    pub fn distinct_display_names<'r, I>(&self, raws: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'r str>,
    {
        let mut names: Vec<String> = Vec::new();
        for raw in raws {
            let name = self.display_name(raw);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// `"cama_mesa_banho"` -> `"Cama Mesa Banho"`.
///
/// A letter is upper-cased when it follows a non-letter and lower-cased otherwise. Letters whose
/// upper-case form is more than one character are left alone so the result is stable when fed
/// back in.
pub fn prettify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for c in raw.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            let mut mapped = if prev_is_letter {
                c.to_lowercase().collect::<String>()
            } else {
                c.to_uppercase().collect::<String>()
            };
            if mapped.chars().count() != 1 {
                mapped = c.to_string();
            }
            out.push_str(&mapped);
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
