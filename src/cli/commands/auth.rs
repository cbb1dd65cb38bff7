//! Account commands: signup, login, logout, reset-password

use crate::cli::args::{LoginArgs, LogoutArgs, ResetPasswordArgs, SignupArgs};
use crate::client::TaskClient;
use crate::error::TaskdeckResult;
use crate::ui::{self, Level, TaskSpinner, UiContext};

const SIGNUP_OK: &str = "Account created successfully! You can login now.";
const LOGIN_OK: &str = "Logged in successful!";
const LOGOUT_OK: &str = "Logged out";

/// Execute the signup command
pub async fn signup(args: SignupArgs, client: &TaskClient) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Creating account...");

    let result = client
        .signup(&args.name, &args.email, &args.password)
        .await;
    spinner.clear();
    result?;

    ui::notify(&ctx, Level::Info, SIGNUP_OK);
    Ok(())
}

/// Execute the login command
pub async fn login(args: LoginArgs, client: &TaskClient) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Signing in...");

    let result = client.login(&args.email, &args.password).await;
    spinner.clear();
    result?;

    ui::notify(&ctx, Level::Success, LOGIN_OK);
    Ok(())
}

/// Execute the logout command (local only, cached tasks are kept)
pub async fn logout(args: LogoutArgs, client: &TaskClient) -> TaskdeckResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    if !client.session().is_authenticated() {
        ui::notify(&ctx, Level::Info, "Not logged in");
        return Ok(());
    }

    if !ui::confirm(&ctx, "Are you sure you want to logout?", false).await? {
        ui::notify(&ctx, Level::Info, "Logout cancelled");
        ui::remark(&ctx, "Pass --yes to skip the confirmation");
        return Ok(());
    }

    client.logout();
    ui::notify(&ctx, Level::Success, LOGOUT_OK);
    Ok(())
}

/// Execute the reset-password command; the session ends on success
pub async fn reset_password(args: ResetPasswordArgs, client: &TaskClient) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Updating password...");

    let result = client
        .reset_password(&args.current, &args.new_password, args.confirm.as_deref())
        .await;
    spinner.clear();
    let message = result?;

    ui::notify(&ctx, Level::Success, &message);
    ui::remark(&ctx, "Log in again with: taskdeck login");
    Ok(())
}
