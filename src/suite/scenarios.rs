//! Built-in suite: the Tech Impact volunteer portal test cases.
//!
//! Selector strings and field values are fixture data taken from the
//! portal's UI. Anything account-related goes through
//! [`Step::Authenticate`](super::Step::Authenticate) so that credentials
//! stay in configuration.

use super::{Role, Scenario};
use crate::driver::SelectorSpec;

/// Hamburger toggle for the dashboard side panel. The page renders one per
/// breakpoint, so the fixture pins the first in document order.
fn menu_toggle() -> SelectorSpec {
    SelectorSpec::by_css(".menu-bars").first()
}

/// Navigation clicks on the landing header. `first()` mirrors the page
/// having the label both as a button and in body copy.
fn landing_link(label: &str) -> SelectorSpec {
    SelectorSpec::by_text(label).first()
}

/// The full built-in suite, in declaration order.
pub fn builtin_suite() -> Vec<Scenario> {
    let mut suite = Vec::new();
    suite.extend(landing_page());
    suite.extend(sign_up());
    suite.extend(login());
    suite.extend(volunteer_dashboard());
    suite.extend(admin());
    suite
}

fn landing_page() -> Vec<Scenario> {
    vec![
        Scenario::new("TC001", "Landing page shows Login and Sign Up")
            .navigate("/")
            .assert_visible(SelectorSpec::by_text("Login"))
            .assert_visible(SelectorSpec::by_text("Sign Up")),
        Scenario::new("TC002", "Login button leads to the login page")
            .navigate("/")
            .click(landing_link("Login"))
            .assert_url(".*login"),
        Scenario::new("TC003", "Sign Up button leads to the registration page")
            .navigate("/")
            .click(landing_link("Sign Up"))
            .assert_url(".*register"),
    ]
}

fn sign_up() -> Vec<Scenario> {
    vec![
        Scenario::new("TC004", "New user can sign up")
            .navigate("/")
            .click(landing_link("Sign Up"))
            .assert_url(".*register")
            .fill(
                SelectorSpec::by_placeholder("Enter your name here"),
                "Vivek Modi",
            )
            .fill(
                SelectorSpec::by_placeholder("Enter your email ID here"),
                "vivek1@gmail.com",
            )
            .fill(
                SelectorSpec::by_placeholder("Choose your username (Login"),
                "Vivek1",
            )
            .fill(
                SelectorSpec::by_placeholder("Choose a strong password"),
                "Vivek123",
            )
            .fill(
                SelectorSpec::by_placeholder("Re-enter the password"),
                "Vivek123",
            )
            .click(SelectorSpec::by_role("button", "Sign Up")),
        Scenario::new("TC005", "Signing up with an existing username shows an error")
            .navigate("/")
            .click(landing_link("Sign Up"))
            .assert_url(".*register")
            .fill(
                SelectorSpec::by_placeholder("Choose your username (Login"),
                "admin",
            )
            .fill(
                SelectorSpec::by_placeholder("Choose a strong password"),
                "password",
            )
            .fill(
                SelectorSpec::by_placeholder("Re-enter the password"),
                "password",
            )
            .click(SelectorSpec::by_role("button", "Sign Up"))
            .assert_text("The username already exists!"),
        Scenario::new("TC006", "Registration page links back to the login page")
            .navigate("/")
            .click(landing_link("Sign Up"))
            .assert_url(".*register")
            .click(SelectorSpec::by_role("link", "Login"))
            .assert_url(".*/login$"),
    ]
}

fn login() -> Vec<Scenario> {
    vec![
        Scenario::new("TC007", "Volunteer can log in")
            .navigate("/")
            .click(landing_link("Login"))
            .fill(SelectorSpec::by_css("input[name=\"username\"]"), "Vivek")
            .fill(SelectorSpec::by_css("input[name=\"password\"]"), "Vivek123")
            .click(SelectorSpec::by_role("button", "Login"))
            .assert_visible(SelectorSpec::by_role("heading", "Welcome to Tech Impact")),
        Scenario::new("TC008", "Invalid credentials do not log in")
            .navigate("/")
            .click(landing_link("Login"))
            .fill(
                SelectorSpec::by_css("input[name=\"username\"]"),
                "InvalidUsername",
            )
            .fill(
                SelectorSpec::by_css("input[name=\"password\"]"),
                "InvalidPassword",
            )
            .click(SelectorSpec::by_role("button", "Login"))
            .assert_url(".*login"),
        Scenario::new("TC009", "Login page links to the registration page")
            .navigate("/")
            .click(landing_link("Login"))
            .assert_text("Create an account? Sign-Up")
            .click(SelectorSpec::by_role("link", "Sign-Up"))
            .assert_url(".*register"),
    ]
}

fn volunteer_dashboard() -> Vec<Scenario> {
    vec![
        Scenario::new("TC010", "Shifts link opens the shift calendar")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_role_exact("link", "Shifts"))
            .assert_visible(SelectorSpec::by_role("img", "company logo").first()),
        Scenario::new("TC011", "Profile link opens the profile page")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Profile"))
            .assert_visible(SelectorSpec::by_role("heading", "PROFILE")),
        Scenario::new("TC012", "History link opens the shift history")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "History"))
            .assert_visible(SelectorSpec::by_role("heading", "Volunteer Shift History")),
        Scenario::new("TC013", "Home link returns to the dashboard")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Home").first())
            .assert_text("Welcome to Tech Impact"),
        Scenario::new("TC014", "Logout from the side panel returns to the login page")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Logout").first())
            .assert_text("Login to your account"),
        Scenario::new("TC015", "Upcoming Shifts lists the volunteer's shifts")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Upcoming Shifts").first())
            .assert_text("My Upcoming Shifts"),
        Scenario::new("TC016", "Shifts section shows the shift calendar")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shifts").first())
            .assert_visible(SelectorSpec::by_role("img", "company logo").first()),
        Scenario::new("TC017", "Volunteer can update their profile")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Profile").first())
            .assert_visible(SelectorSpec::by_role("heading", "PROFILE"))
            .click(SelectorSpec::by_role("button", "UPDATE"))
            .click(SelectorSpec::by_role("button", "SAVE")),
        Scenario::new("TC018", "Volunteer can access their history")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("History").first())
            .assert_text("Volunteer Shift History"),
        Scenario::new("TC019", "Volunteer can open detailed shift information")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shifts").first())
            .assert_visible(SelectorSpec::by_role("img", "company logo").first()),
        Scenario::new("TC020", "Volunteer can reach shift sign-up from the calendar")
            .authenticate(Role::Volunteer)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shifts").first())
            .assert_visible(SelectorSpec::by_role("img", "company logo").first()),
    ]
}

fn admin() -> Vec<Scenario> {
    vec![
        Scenario::new("TC021", "Admin can access shift management")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shift Management").first())
            .assert_visible(SelectorSpec::by_role("button", "Create Shift")),
        Scenario::new("TC022", "Admin can open the shift booking form")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shift Management").first())
            .click(SelectorSpec::by_role("button", "Create Shift"))
            .assert_visible(SelectorSpec::by_role("button", "ADD")),
        Scenario::new("TC023", "Shift calendar offers a Day view")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shift Management").first())
            .assert_visible(SelectorSpec::by_role("button", "Day")),
        Scenario::new("TC024", "Shift calendar offers a Week view")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shift Management").first())
            .assert_visible(SelectorSpec::by_role_exact("button", "Week")),
        Scenario::new("TC025", "Shift calendar offers a Month view")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_text("Shift Management").first())
            .assert_visible(SelectorSpec::by_role("button", "Month")),
        Scenario::new("TC026", "Admin can access their profile")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Profile"))
            .assert_visible(SelectorSpec::by_role("heading", "PROFILE")),
        Scenario::new("TC027", "Admin can update their profile")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Profile"))
            .click(SelectorSpec::by_role("button", "UPDATE"))
            .click(SelectorSpec::by_role("button", "SAVE")),
        Scenario::new("TC028", "Admin can access pending shift approvals")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Approve Shifts"))
            .assert_text("PENDING SHIFT APPROVAL"),
        Scenario::new("TC029", "Admin can approve shifts")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Approve Shifts"))
            .assert_text("PENDING SHIFT APPROVAL"),
        Scenario::new("TC030", "Admin can cancel shifts from the approval list")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Approve Shifts"))
            .assert_text("PENDING SHIFT APPROVAL"),
        Scenario::new("TC031", "Admin can approve new volunteers")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Approve Volunteers"))
            .assert_text("PENDING USER APPROVAL"),
        Scenario::new("TC032", "Admin can deny new volunteers")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Approve Volunteers"))
            .assert_text("PENDING USER APPROVAL"),
        Scenario::new("TC033", "Admin can view the staff list")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Staff List"))
            .assert_text("STAFF LIST"),
        Scenario::new("TC034", "Admin can log out")
            .authenticate(Role::Admin)
            .click(menu_toggle())
            .click(SelectorSpec::by_role("link", "Logout"))
            .assert_text("Login to your account"),
    ]
}
