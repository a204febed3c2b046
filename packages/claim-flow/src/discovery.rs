//! Boundary to the token discovery service: a paginated HTTP endpoint owned
//! by a collaborator. The core only consumes the resulting address list as
//! resolver candidates; the transport lives with the host.

use cosmwasm_std::Addr;

use crate::error::DiscoveryError;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenPage {
    pub tokens: Vec<Addr>,
    pub next: Option<String>,
}

pub trait TokenDiscovery {
    fn deployed_tokens_page(
        &self,
        wallet: &Addr,
        cursor: Option<&str>,
    ) -> Result<TokenPage, DiscoveryError>;
}

/// Drains the paginated endpoint, bounded by `max_pages`.
pub fn collect_deployed_tokens<D: TokenDiscovery>(
    discovery: &D,
    wallet: &Addr,
    max_pages: usize,
) -> Result<Vec<Addr>, DiscoveryError> {
    let mut tokens = Vec::new();
    let mut cursor: Option<String> = None;
    for _ in 0..max_pages {
        let page = discovery.deployed_tokens_page(wallet, cursor.as_deref())?;
        tokens.extend(page.tokens);
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(tokens)
}
