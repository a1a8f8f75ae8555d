//! Tag type lookups.
//!
//! Tag types are the program tags configured in the Marketo admin area.
//! Each carries its allowed values; a program tag pairs a type with one of
//! them (see [`Tag`]).

use crate::client::MarketoClient;
use crate::entity::Tag;
use crate::error::Result;
use crate::params::{Page, Params};

pub async fn browse_tag_types(client: &MarketoClient, page: &Page) -> Result<Vec<Tag>> {
    let params = Params::new().page(page);
    let response = client.get_asset("/tagTypes.json", &params).await?;
    response.check_is_success()?;
    response.results()
}

pub async fn get_tag_type_by_name(client: &MarketoClient, name: &str) -> Result<Option<Tag>> {
    let params = Params::new().push("name", name);
    let response = client.get_asset("/tagType/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}
