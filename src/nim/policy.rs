/// Request policy for one hosted model. An explicit table rather than
/// matching on substrings of the model id, so adding a model means adding
/// a row and nothing else.
#[derive(Debug, PartialEq)]
pub struct ModelPolicy {
    /// Model id as the inference endpoint expects it.
    pub id: &'static str,
    /// Name shown to the user when switching.
    pub display_name: &'static str,
    pub temperature: f64,
    /// Whether to request extended reasoning via `chat_template_kwargs`.
    pub thinking: bool,
}

static POLICIES: [ModelPolicy; 2] = [
    ModelPolicy {
        id: "moonshotai/kimi-k2.5",
        display_name: "Kimi K2.5",
        temperature: 1.0,
        thinking: true,
    },
    ModelPolicy {
        id: "zhipuai/glm-5-plus",
        display_name: "GLM-5",
        temperature: 0.7,
        thinking: false,
    },
];

impl ModelPolicy {
    pub fn default_id() -> &'static str {
        POLICIES[0].id
    }

    pub fn lookup(id: &str) -> Option<&'static ModelPolicy> {
        POLICIES.iter().find(|p| p.id == id)
    }

    pub fn known_ids() -> Vec<&'static str> {
        POLICIES.iter().map(|p| p.id).collect()
    }

    /// The next entry in the table, wrapping around. With two entries this
    /// is a toggle.
    pub fn next(&self) -> &'static ModelPolicy {
        let idx = POLICIES.iter().position(|p| p.id == self.id).unwrap_or(0);
        &POLICIES[(idx + 1) % POLICIES.len()]
    }
}
