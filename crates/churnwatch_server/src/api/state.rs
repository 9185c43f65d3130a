use churnwatch_drift::DriftEvaluator;
use churnwatch_log::ProductionLog;
use churnwatch_model::ChurnClassifier;
use churnwatch_settings::ChurnwatchServerConfig;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<ChurnwatchServerConfig>,
    pub model: Arc<dyn ChurnClassifier>,
    pub production_log: Arc<ProductionLog>,
    pub evaluator: Arc<DriftEvaluator>,
}
