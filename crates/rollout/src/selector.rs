//! Network Selector - resolves the organization and the ordered target list.

use crate::error::{Error, Result};
use crate::types::NetworkRef;
use dashboard::{Backend, Organization};

/// Operator's answer to "which networks?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every listed network.
    All,
    /// 1-based positions into the listed networks, in the order given.
    Indices(Vec<usize>),
}

impl Selection {
    /// Parse `all` (any case) or a comma-separated list of 1-based numbers.
    ///
    /// Pieces that are not plain digits are ignored, so `"1, x, 3"` selects
    /// the first and third networks.
    pub fn parse(answer: &str) -> Self {
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("all") {
            return Self::All;
        }

        let indices = answer
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty() && piece.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|piece| piece.parse::<usize>().ok())
            .collect();
        Self::Indices(indices)
    }
}

/// List organizations; an empty listing is fatal.
pub fn list_organizations<B: Backend + ?Sized>(backend: &B) -> Result<Vec<Organization>> {
    let orgs = backend.organizations()?;
    if orgs.is_empty() {
        return Err(Error::NoOrganizations);
    }
    log::debug!("Found {} organizations", orgs.len());
    Ok(orgs)
}

/// Resolve a 1-based organization pick.
///
/// Unlike network selection, a bad answer here is an error: there is no
/// sensible subset of one organization.
pub fn pick_organization<'a>(orgs: &'a [Organization], answer: &str) -> Result<&'a Organization> {
    let invalid = || Error::InvalidOrganizationChoice {
        answer: answer.trim().to_string(),
        count: orgs.len(),
    };

    let index: usize = answer.trim().parse().map_err(|_| invalid())?;
    index
        .checked_sub(1)
        .and_then(|i| orgs.get(i))
        .ok_or_else(invalid)
}

/// List every network of an organization, in API order.
pub fn list_networks<B: Backend + ?Sized>(backend: &B, org_id: &str) -> Result<Vec<NetworkRef>> {
    let networks = backend.networks(org_id)?;
    log::debug!("Organization {} has {} networks", org_id, networks.len());
    Ok(networks)
}

/// Networks carrying `tag`, in their original order.
///
/// Literal membership only: no wildcards, no case folding.
pub fn filter_by_tag(networks: &[NetworkRef], tag: &str) -> Vec<NetworkRef> {
    networks.iter().filter(|n| n.has_tag(tag)).cloned().collect()
}

/// Narrow the candidate list to the operator's selection.
///
/// Invalid or out-of-range selection indices are ignored rather than
/// rejected. A network picked twice is kept once, at its first position.
pub fn narrow_by_selection(networks: &[NetworkRef], selection: &Selection) -> Vec<NetworkRef> {
    match selection {
        Selection::All => networks.to_vec(),
        Selection::Indices(indices) => {
            let mut picked: Vec<usize> = Vec::with_capacity(indices.len());
            for index in indices {
                let Some(position) = index.checked_sub(1) else {
                    log::debug!("Ignoring selection index 0");
                    continue;
                };
                if position >= networks.len() {
                    log::debug!("Ignoring out-of-range selection index {}", index);
                    continue;
                }
                if !picked.contains(&position) {
                    picked.push(position);
                }
            }
            picked.into_iter().map(|i| networks[i].clone()).collect()
        }
    }
}
