use colored::*;
use hostdb_common::config::Config;
use hostdb_core::HostRecord;
use hostdb_core::vendors::VendorRepository;
use tracing::info;

use crate::hprint;
use crate::session::{Access, Session};
use crate::terminal::{colors, format, print};

pub fn list(cfg: &Config) -> anyhow::Result<()> {
    let session = Session::open(cfg, Access::Read)?;
    let store = session.store();

    if store.is_empty() {
        print::header("empty database", cfg.quiet);
        print::no_results("records");
        return Ok(());
    }

    print::header("host records", cfg.quiet);
    let indices: Vec<usize> = (0..store.len()).collect();
    print_records(store.records(), &indices, None, cfg);
    print_summary(store.len(), cfg);
    Ok(())
}

pub fn find(key: &str, cfg: &Config) -> anyhow::Result<()> {
    let mut session = Session::open(cfg, Access::Read)?;
    let matches: Vec<usize> = session.store_mut().lookup(key);

    if matches.is_empty() {
        info!("nothing matches '{key}'");
        return Ok(());
    }

    print::header(&format!("matches for {key}"), cfg.quiet);
    print_records(session.store().records(), &matches, None, cfg);
    Ok(())
}

/// Prints the records at `indices` as trees, one blank line apart.
/// With `-qq` only the heads are printed.
pub fn print_records(records: &[HostRecord], indices: &[usize], vendors: Option<&dyn VendorRepository>, cfg: &Config) {
    for (pos, &idx) in indices.iter().enumerate() {
        let Some(record) = records.get(idx) else {
            continue;
        };
        print::tree_head(idx, &format::display_name(record));
        if cfg.quiet < 2 {
            print::as_tree_one_level(&format::record_details(record, vendors));
            if pos + 1 != indices.len() {
                hprint!();
            }
        }
    }
}

fn print_summary(count: usize, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    let output: ColoredString = format!("{} records", count.to_string().bold().green()).color(colors::TEXT_DEFAULT);
    print::fat_separator();
    print::centerln(&output.to_string());
}
