pub type Result<T> = std::result::Result<T, DescriptionError>;

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("Invalid process description JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid process description JSON5: {0}")]
    Json5(#[from] json5::Error),

    #[error("Duplicate step id `{id}` (phases `{first_phase}` and `{second_phase}`)")]
    DuplicateStepId {
        id: String,
        first_phase: String,
        second_phase: String,
    },

    #[error("Estimation block `{block}` references unknown step `{step}`")]
    UnknownBlockStep { block: String, step: String },

    #[error("Step id `{id}` is reserved for the start and end markers")]
    ReservedStepId { id: String },

    #[error("Step #{index} in phase `{phase}` has an empty id")]
    EmptyStepId { phase: String, index: usize },
}
