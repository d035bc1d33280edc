use crate::display;
use crate::AppState;
use anyhow::bail;
use rentdesk_core::ProfileUpdate;

/// Show one page of past rentals; `page` is one-based
pub async fn rentals(state: &AppState, page: u32, size: u32) -> anyhow::Result<()> {
    if page == 0 || size == 0 {
        bail!("--page and --size start at 1");
    }

    let records = state.client.rental_history(page - 1, size).await?;
    println!("{}", display::history(&records));
    if records.len() as u32 >= size {
        println!("More: rentdesk rentals --page {} --size {}", page + 1, size);
    }
    Ok(())
}

pub async fn edit(state: &AppState, update: ProfileUpdate) -> anyhow::Result<()> {
    let update = update.validated()?;
    let message = state.client.update_profile(&update).await?;
    println!(
        "{}",
        message.unwrap_or_else(|| "Profile updated successfully!".to_string())
    );
    Ok(())
}
