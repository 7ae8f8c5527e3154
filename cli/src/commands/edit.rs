//! Commands that change individual records.

use anyhow::Context;
use hostdb_common::config::Config;
use hostdb_common::network::ip::parse_ip;
use hostdb_core::{AddOutcome, StoreError};
use tracing::info;

use crate::session::{Access, Session};

pub fn add(ip: &str, hostname: &str, mac: &str, comments: &[String], cfg: &Config) -> anyhow::Result<()> {
    let ip = parse_ip(ip).with_context(|| format!("'{ip}' is not an IP address"))?;

    let mut session = Session::open(cfg, Access::Write)?;
    let outcome = session
        .store_mut()
        .add(ip, hostname, mac, comments.iter().cloned())
        .context("adding record")?;
    session.commit()?;

    match outcome {
        AddOutcome::Merged(idx) => info!("merged into record {idx}"),
        AddOutcome::Appended(idx) => info!("stored as record {idx}"),
    }
    Ok(())
}

pub fn merge(indices: &[usize], cfg: &Config) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, Access::Write)?;
    let merged: usize = session
        .store_mut()
        .merge(indices.iter().copied())
        .context("merging records")?;
    session.commit()?;

    info!("merged {} records into record {merged}", indices.len());
    Ok(())
}

pub fn delete(indices: &[usize], cfg: &Config) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, Access::Write)?;
    let removed = session
        .store_mut()
        .remove_many(indices.iter().copied())
        .context("deleting records")?;
    session.commit()?;

    info!("deleted {} records", removed.len());
    Ok(())
}

pub fn comment(index: usize, text: &str, cfg: &Config) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, Access::Write)?;
    let len: usize = session.store().len();
    let record = session
        .store_mut()
        .get_mut(index)
        .ok_or(StoreError::IndexOutOfRange { index, len })?;

    if !record.comments.insert(text.to_string()) {
        info!("record {index} already carries this comment");
        return Ok(());
    }
    session.commit()?;

    info!("commented record {index}");
    Ok(())
}
