mod analytics_tests;
mod dashboard_tests;
mod data_studio_tests;
mod property_tests;
mod report_tests;
mod upload_tests;
