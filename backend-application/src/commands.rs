// Command handlers: operations that call upstream and write to the store

pub mod recap_commands;
pub mod sync_commands;
pub mod timeline_commands;

use backend_domain::RiotHandle;

use crate::AppError;

pub(crate) fn normalize_handle(game_name: &str, tag_line: &str) -> Result<RiotHandle, AppError> {
    let game_name = game_name.trim();
    let tag_line = tag_line.trim().trim_start_matches('#');
    if game_name.is_empty() {
        return Err(AppError::BadRequest("game name must not be empty".to_string()));
    }
    if tag_line.is_empty() {
        return Err(AppError::BadRequest("tag line must not be empty".to_string()));
    }
    Ok(RiotHandle::new(game_name, tag_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_trimmed() {
        let handle = normalize_handle(" Faker ", "#KR1").expect("handle");
        assert_eq!(handle.to_string(), "Faker#KR1");
    }

    #[test]
    fn blank_parts_are_rejected() {
        let err = normalize_handle("Faker", "  ").expect_err("blank tag");
        match err {
            AppError::BadRequest(message) => assert!(message.contains("tag line")),
            _ => panic!("unexpected error type"),
        }
        assert!(normalize_handle("", "KR1").is_err());
    }
}
