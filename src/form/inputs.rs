use tracing::error;

/// Returned by choice readers when nothing usable is selected
pub const NO_SELECTION: i32 = -1;

/// Value of the checked option among `(value, checked)` pairs, or [`NO_SELECTION`]
pub fn checked_value<'a, I>(group: &str, options: I) -> i32
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    match options.into_iter().find(|(_, checked)| *checked) {
        Some((value, _)) => value.trim().parse().unwrap_or_else(|_| {
            error!("Error reading {}: selected value {:?} is not a number", group, value);
            NO_SELECTION
        }),
        None => {
            error!("Error reading {}: no {} value selected", group, group);
            NO_SELECTION
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub value: String,
    pub checked: bool,
}

/// A named group of mutually exclusive options (a radio group)
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceGroup {
    pub name: String,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceGroup {
    pub fn new<I, V>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self {
            name: name.to_string(),
            options: values
                .into_iter()
                .map(|value| ChoiceOption {
                    value: value.to_string(),
                    checked: false,
                })
                .collect(),
        }
    }

    /// Bedroom group offered by the widget, 1 to 5 BHK
    pub fn bhk() -> Self {
        Self::new("BHK", 1..=5)
    }

    /// Bathroom group offered by the widget, 1 to 5 bathrooms
    pub fn bathrooms() -> Self {
        Self::new("bathroom", 1..=5)
    }

    /// Check `value` and uncheck everything else. Unknown values leave the group unchecked.
    pub fn select(&mut self, value: &str) -> bool {
        let mut found = false;
        for option in &mut self.options {
            option.checked = option.value == value;
            found |= option.checked;
        }
        found
    }

    pub fn clear(&mut self) {
        for option in &mut self.options {
            option.checked = false;
        }
    }

    pub fn value(&self) -> i32 {
        checked_value(
            &self.name,
            self.options
                .iter()
                .map(|option| (option.value.as_str(), option.checked)),
        )
    }
}

/// Clamp a negative square footage entry to `0`, leaving anything else as typed
pub fn clamp_sqft_input(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value < 0.0 => "0".to_string(),
        _ => raw.to_string(),
    }
}

/// Everything the user has entered into the widget
#[derive(Debug, Clone)]
pub struct FormInput {
    pub sqft: String,
    pub bhk: ChoiceGroup,
    pub bath: ChoiceGroup,
    pub location: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            sqft: String::new(),
            bhk: ChoiceGroup::bhk(),
            bath: ChoiceGroup::bathrooms(),
            location: String::new(),
        }
    }
}
