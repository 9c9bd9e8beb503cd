use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubcriterionNode {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriterionNode {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub subcriteria: Vec<SubcriterionNode>,
}

// 标准的指标树
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaTreeResponse {
    pub standard_id: i64,
    pub standard_name: String,
    pub criteria: Vec<CriterionNode>,
}
