use anyhow::Result;
use chrono::Utc;
use inventory_chat_core::{PolicyConfig, PromptInput, Role, SchemaSnapshot, build_prompt};

/// Prints the prompt for `text`. Uses the live schema when `DATABASE_URL` is
/// set, an empty one otherwise.
pub(crate) async fn run(user: &str, admin: bool, text: &str) -> Result<()> {
    let snapshot = if std::env::var_os("DATABASE_URL").is_some() {
        super::schema::fetch().await?
    } else {
        tracing::warn!("DATABASE_URL not set, building prompt with an empty schema");
        SchemaSnapshot::new(Vec::new(), Utc::now())
    };
    let schema_json = snapshot.to_prompt_json()?;
    let policy = PolicyConfig::from_env();
    let prompt = build_prompt(&PromptInput {
        username: user,
        role: if admin { Role::Admin } else { Role::Member },
        message: text.trim(),
        schema_json: &schema_json,
        max_values_per_statement: policy.max_values_per_statement,
    });
    println!("{prompt}");
    Ok(())
}
