use crate::args::hints::cmd;
use crate::context::ExecutionContext;
use crate::presentation::hint;

pub fn handle(ctx: &ExecutionContext) {
    let palette = ctx.palette;
    let logged_in = ctx.credentials_path().exists();

    println!("{}", palette.heading("callboard"));
    println!("Backend:   {}", ctx.config().backend_url);
    println!("Workspace: {}", ctx.workspace().display());
    println!();

    if !logged_in {
        println!("{}", hint(palette, "Log in", cmd::AUTH_LOGIN));
        println!("{}", hint(palette, "Or create an account", cmd::AUTH_REGISTER));
        return;
    }
    println!("{}", hint(palette, "See your agents", cmd::AGENT_LIST));
    println!("{}", hint(palette, "Place a test call", cmd::TEST_CALL_WEB));
    println!("{}", hint(palette, "Review calls", cmd::CALL_LIST));
}
