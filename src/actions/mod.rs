//! 动作层：主控决策（Decision / LeadAction）与子智能体计划（Plan）的数据模型与校验
//!
//! LLM 输出一律视为不可信输入：先经 `parse_decision` / `parse_plan` 全量校验，
//! 通过后才得到强类型值，任何一处不合法都整体拒绝。

pub mod schema;
pub mod types;

pub use schema::{decision_schema_json, parse_decision, parse_plan, plan_schema_json, SchemaViolation};
pub use types::{ActionType, Decision, ExtractionPlan, LeadAction, LeadCriteria, Plan};
