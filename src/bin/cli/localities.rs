use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::ClientError;

/// Public IBGE localities API
pub const DEFAULT_IBGE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// A Brazilian state as listed by IBGE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbgeState {
    /// Two-letter abbreviation (UF)
    pub sigla: String,
    pub nome: String,
}

#[derive(Debug, Deserialize)]
struct IbgeCity {
    nome: String,
}

/// Sorts states by their abbreviation
fn sort_states(mut states: Vec<IbgeState>) -> Vec<IbgeState> {
    states.sort_by(|a, b| a.sigla.cmp(&b.sigla));
    states
}

/// Client for the IBGE state and city listings
pub struct IbgeClient {
    base_url: String,
    client: Client,
}

impl IbgeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Lists every state, ordered by UF
    pub async fn list_states(&self) -> Result<Vec<IbgeState>, ClientError> {
        let url = format!("{}/estados", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let states: Vec<IbgeState> = response.json().await?;
        Ok(sort_states(states))
    }

    /// Lists the city names of one state, in the order IBGE returns them
    pub async fn list_cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/estados/{}/municipios", self.base_url, uf);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let cities: Vec<IbgeCity> = response.json().await?;
        Ok(cities.into_iter().map(|c| c.nome).collect())
    }
}
