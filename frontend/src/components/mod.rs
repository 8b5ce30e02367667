pub mod budget_summary;
pub mod expense_list;
pub mod input_bar;
pub mod login_screen;
pub mod month_nav;
pub mod onboarding_screen;
pub mod settings_screen;

pub use budget_summary::BudgetSummary;
pub use expense_list::ExpenseList;
pub use input_bar::InputBar;
pub use login_screen::LoginScreen;
pub use month_nav::MonthNav;
pub use onboarding_screen::OnboardingScreen;
pub use settings_screen::SettingsScreen;
