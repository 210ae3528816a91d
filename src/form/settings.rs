use std::time::Duration;

/// Which address input a step is working on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    City,
    Street,
    Building,
}

impl AddressField {
    /// Fields in the order the form enables them
    pub const ORDER: [AddressField; 3] = [AddressField::City, AddressField::Street, AddressField::Building];

    pub fn name(&self) -> &'static str {
        match self {
            AddressField::City => "city",
            AddressField::Street => "street",
            AddressField::Building => "building",
        }
    }
}

/// Bounds for every wait the form controller performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTimings {
    /// Delay between two checks of a condition
    pub poll_interval: Duration,

    /// How long the form itself may take to appear after page load
    pub form_present: Duration,

    /// How long to wait for the blocking modal to show up
    pub modal_appear: Duration,

    /// How long the modal may take to disappear after its close button was clicked
    pub modal_dismiss: Duration,

    pub field_interactable: Duration,

    pub field_enabled: Duration,

    /// How long an autocomplete list may take to fill in
    pub suggestions: Duration,

    /// Pause around synthetic key presses
    pub key_gap: Duration,

    /// Grace period after each field for the page to react
    pub settle: Duration,

    pub schedule_render: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            form_present: Duration::from_secs(5),
            modal_appear: Duration::from_secs(5),
            modal_dismiss: Duration::from_secs(2),
            field_interactable: Duration::from_secs(5),
            field_enabled: Duration::from_secs(20),
            suggestions: Duration::from_secs(8),
            key_gap: Duration::from_millis(100),
            settle: Duration::from_secs(1),
            schedule_render: Duration::from_secs(20),
        }
    }
}

impl FormTimings {
    /// Use the request timeout for the long waits (field enable, schedule render)
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.field_enabled = timeout;
        self.schedule_render = timeout;
        self
    }
}

/// Selectors of the address form and the schedule it renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub form_selector: String,
    pub city_selector: String,
    pub street_selector: String,
    pub building_selector: String,
    pub table_selector: String,

    /// Close buttons of the blocking modal, tried in order
    pub modal_close_selectors: Vec<String>,

    /// Autocomplete lists are `#<input id><suffix>`
    pub suggestion_list_suffix: String,

    pub timings: FormTimings,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            form_selector: "#discon_form".to_string(),
            city_selector: "#city".to_string(),
            street_selector: "#street".to_string(),
            building_selector: "#house_num".to_string(),
            table_selector: "#tableRenderElem table".to_string(),
            modal_close_selectors: vec![
                "button.modal_close.m-attention_close".to_string(),
                "[data-micromodal-close]".to_string(),
                ".modal_close".to_string(),
                "button[aria-label*='Close']".to_string(),
            ],
            suggestion_list_suffix: "autocomplete-list".to_string(),
            timings: FormTimings::default(),
        }
    }
}

impl FormSettings {
    pub fn with_timings(mut self, timings: FormTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Input selector for a field
    pub fn selector(&self, field: AddressField) -> &str {
        match field {
            AddressField::City => &self.city_selector,
            AddressField::Street => &self.street_selector,
            AddressField::Building => &self.building_selector,
        }
    }

    /// Autocomplete list selector for a field, e.g. `#cityautocomplete-list`
    pub fn suggestion_list(&self, field: AddressField) -> String {
        let input = self.selector(field);
        let id = input.trim_start_matches('#');
        format!("#{}{}", id, self.suggestion_list_suffix)
    }

    /// First item of a field's autocomplete list
    pub fn first_suggestion(&self, field: AddressField) -> String {
        format!("{} > div:first-child", self.suggestion_list(field))
    }
}
