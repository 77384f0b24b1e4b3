//! `imatch responses`: list the submission log.

use internmatch_io::ResponseLog;

use crate::exit_codes::log_exit_code;
use crate::util::format_table;
use crate::{print_json, AppContext, CliError};

const MAX_COLUMN_WIDTH: usize = 32;

pub fn cmd_responses(ctx: &AppContext, json: bool) -> Result<(), CliError> {
    let log = ResponseLog::new(ctx.responses_path.clone());
    let records = log.read_all().map_err(|e| CliError {
        code: log_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })?;

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No responses recorded in {}.", log.path().display());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.timestamp.clone(),
                r.name.clone(),
                r.contact.clone(),
                r.domain.clone(),
                r.job_role.clone(),
                r.level.clone(),
                r.industry.clone(),
            ]
        })
        .collect();

    print!(
        "{}",
        format_table(
            &["Timestamp", "Name", "Contact", "Domain", "Job Role", "Level", "Industry"],
            &rows,
            MAX_COLUMN_WIDTH,
        )
    );
    println!("\n{} response(s)", records.len());
    Ok(())
}
