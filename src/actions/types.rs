//! Decision / LeadAction / Plan
//!
//! JSON 字段名沿用前端约定（camelCase，`type: "generate_lead"`）。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 动作类型：目前只有线索生成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ActionType {
    #[serde(rename = "generate_lead")]
    GenerateLead,
}

/// 线索筛选条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadCriteria {
    #[schemars(length(min = 1))]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_karma: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// 主控交给子智能体的一项工作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LeadAction {
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[schemars(length(min = 1))]
    pub subreddit: String,
    pub criteria: LeadCriteria,
    #[schemars(range(min = 1))]
    pub count: u32,
}

impl LeadAction {
    pub fn generate_lead(subreddit: impl Into<String>, keywords: Vec<String>, count: u32) -> Self {
        Self {
            kind: ActionType::GenerateLead,
            subreddit: subreddit.into(),
            criteria: LeadCriteria {
                keywords,
                min_karma: None,
                notes: None,
            },
            count,
        }
    }

    /// 类型层面无法表达的约束，`path` 为该动作在 JSON 中的位置
    pub(crate) fn invariant_issues(&self, path: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if self.subreddit.is_empty() {
            issues.push(format!("{path}.subreddit: must not be empty"));
        }
        if self.criteria.keywords.is_empty() {
            issues.push(format!("{path}.criteria.keywords: must contain at least one keyword"));
        }
        if self.count == 0 {
            issues.push(format!("{path}.count: must be at least 1"));
        }
        issues
    }
}

/// 主控决策：给用户的回复 + 有序动作列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    #[schemars(length(min = 1))]
    pub reply: String,
    pub actions: Vec<LeadAction>,
}

impl Decision {
    pub(crate) fn invariant_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.reply.is_empty() {
            issues.push("reply: must not be empty".to_string());
        }
        for (i, action) in self.actions.iter().enumerate() {
            issues.extend(action.invariant_issues(&format!("actions[{i}]")));
        }
        issues
    }
}

/// 提取步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionPlan {
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_selectors: Option<Vec<String>>,
}

/// 子智能体为单个动作给出的执行计划
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_search: Option<Vec<String>>,
    pub extraction_plan: ExtractionPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<String>>,
}
