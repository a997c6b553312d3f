pub mod agent_tools;
pub mod analytics;
pub mod dashboard;
pub mod data_studio;
pub mod new_property;
pub mod property_detail;
pub mod public_report;

pub use agent_tools::{agent_tools_page, AgentToolsVm};
pub use analytics::{analytics_page, sqft_impact_fragment, train_result_fragment, AnalyticsVm};
pub use dashboard::{dashboard_page, ListVm};
pub use data_studio::data_studio_page;
pub use new_property::new_property_page;
pub use property_detail::{
    progress_overlay, property_detail_page, property_unavailable_page, DetailVm,
};
pub use public_report::{chat_messages, public_report_page, report_unavailable_page};
