pub mod counts;
pub mod ids;
pub mod project_ops;
pub mod section_ops;
pub mod view;
