//! 预导入模块，方便使用

pub use super::companies::{Entity as Companies, Model as CompanyModel};
pub use super::criteria::{Entity as Criteria, Model as CriterionModel};
pub use super::evaluation_category_weights::{
    ActiveModel as CategoryWeightActiveModel, Entity as EvaluationCategoryWeights,
    Model as CategoryWeightModel,
};
pub use super::evaluation_scores::{
    ActiveModel as EvaluationScoreActiveModel, Entity as EvaluationScores,
    Model as EvaluationScoreModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::softwares::{Entity as Softwares, Model as SoftwareModel};
pub use super::standards::{Entity as Standards, Model as StandardModel};
pub use super::subcriteria::{Entity as Subcriteria, Model as SubcriterionModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
