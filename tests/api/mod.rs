mod health_tests;
mod post_tests;
mod user_tests;
