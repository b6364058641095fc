use color_eyre::eyre::{eyre, Result, WrapErr};
use heistkit_api::location::LocationFilters;
use heistkit_api::{heist, location, try_iri, user, HttpClient, Page, Selection};
use heistkit_config::HeistkitConfig;
use serde::Serialize;

fn client(cfg: &HeistkitConfig) -> Result<HttpClient> {
    let client = HttpClient::from_config(cfg)?;
    tracing::debug!(event = "api_client", endpoint = client.endpoint());
    Ok(client)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    crate::ui_out!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn checked_id(resource: &str, kind: &str, id: &str) -> Result<String> {
    try_iri(resource, id).ok_or_else(|| eyre!("{id} is not a {kind} id"))
}

pub fn run_user(cfg: &HeistkitConfig, id: &str) -> Result<()> {
    let iri = checked_id(user::RESOURCE, "user", id)?;
    let client = client(cfg)?;
    let found = user::get_user(&client, &iri).wrap_err_with(|| format!("fetching user {id}"))?;
    let user = found.ok_or_else(|| eyre!("user {id} not found"))?;
    print_json(&user)
}

pub fn run_heist(cfg: &HeistkitConfig, id: &str, fields: Option<&str>) -> Result<()> {
    let iri = checked_id(heist::RESOURCE, "heist", id)?;
    let client = client(cfg)?;
    let found = match fields {
        Some(fields) => {
            let selection = Selection::parse_fields(fields)
                .wrap_err_with(|| format!("invalid --fields {fields:?}"))?;
            heist::get_heist_partial(&client, &iri, &selection)
        }
        None => heist::get_heist(&client, &iri),
    }
    .wrap_err_with(|| format!("fetching heist {id}"))?;
    let heist = found.ok_or_else(|| eyre!("heist {id} not found"))?;
    print_json(&heist)
}

pub fn run_locations(cfg: &HeistkitConfig, first: u32) -> Result<()> {
    let client = client(cfg)?;
    let page = location::get_locations(&client, &LocationFilters::default(), &Page::first(first))
        .wrap_err("listing locations")?;
    if let Some(cursor) = page.next_cursor() {
        crate::ui_info!("more results after cursor {cursor}");
    }
    print_json(&page.into_nodes())
}
