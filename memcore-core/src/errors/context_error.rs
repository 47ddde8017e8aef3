/// Context Builder errors.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("budget must be non-negative, got {budget}")]
    InvalidBudget { budget: i64 },

    #[error("estimated tokens {estimated} exceed budget {budget}")]
    BudgetViolated { estimated: u32, budget: u32 },
}
