pub mod cmd {
    // Auth commands
    pub const AUTH_LOGIN: &str = "callboard auth login --email <EMAIL>";
    pub const AUTH_REGISTER: &str = "callboard auth register --email <EMAIL> --full-name <NAME>";

    // Agent commands
    pub const AGENT_LIST: &str = "callboard agent list";
    pub const AGENT_CREATE: &str = "callboard agent create --name <NAME>";

    // Call commands
    pub const CALL_LIST: &str = "callboard call list";
    pub const TEST_CALL_WEB: &str =
        "callboard test-call web --agent <AGENT_ID> --driver <NAME> --load <LOAD>";

    pub fn call_refresh(id: &str) -> String {
        format!("callboard call refresh {}", id)
    }

    pub fn call_await(id: &str) -> String {
        format!("callboard call await {}", id)
    }
}
