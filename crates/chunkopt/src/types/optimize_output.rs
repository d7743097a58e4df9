#[derive(Debug, Default)]
pub struct OptimizeOutput {
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
  pub iterations: usize,
}
