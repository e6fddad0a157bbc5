use serde::Serialize;

use ivco_core::{list_tools, tool_info, ToolInfo};

use crate::cli::ToolInfoArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ListToolsResponseData {
    tools: &'static [ToolInfo],
}

pub fn list() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(ListToolsResponseData {
        tools: list_tools(),
    })?;
    Ok(CommandResult::ok(data))
}

pub fn info(args: &ToolInfoArgs) -> Result<CommandResult, CliError> {
    let tool = tool_info(&args.name).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "unknown tool '{}'; run 'ivco list-tools' for the catalog",
            args.name
        ))
    })?;
    Ok(CommandResult::ok(serde_json::to_value(tool)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_includes_every_tool() {
        let result = list().expect("command succeeds");
        assert_eq!(result.data["tools"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn info_for_unknown_tool_is_invalid_input() {
        let err = info(&ToolInfoArgs {
            name: String::from("nonexistent"),
        })
        .expect_err("unknown tool");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn info_returns_catalog_entry() {
        let result = info(&ToolInfoArgs {
            name: String::from("verify"),
        })
        .expect("command succeeds");
        assert_eq!(result.data["name"], "verify");
        assert_eq!(result.data["layer_name"], "primitive");
    }
}
