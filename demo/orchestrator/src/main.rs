// Demo Orchestrator - walks a full property lifecycle end to end:
// creation, fundraising, income, distribution, claims, revaluation.

use anyhow::Result;
use colored::Colorize;
use registry_core::{AccountId, PlatformConfig, PropertyMetadata, PropertyRegistry};

fn banner(step: &str) {
    println!("\n{}", format!("=== {} ===", step).bold().cyan());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let owner = AccountId::new("fairbrick-platform");
    let manager = AccountId::new("harborview-mgmt");
    let mut registry = PropertyRegistry::new(owner.clone(), PlatformConfig::default())?;

    banner("Property creation");
    let property_id = registry.create_property(
        &owner,
        PropertyMetadata {
            name: "Harborview Residences".into(),
            description: "24-unit waterfront apartment building".into(),
            location: "18 Quay Street, Rotterdam".into(),
            property_type: "residential".into(),
        },
        1_000_000_000_000, // valuation
        1_000_000,         // token supply
        600_000_000_000,   // funding target
        10_000,            // funding deadline (sequence height)
        manager.clone(),
        55_000_000_000, // annual rent estimate
    )?;
    let property = registry.property(property_id)?;
    println!(
        "  property {} listed at {} per token, status {}",
        property_id,
        property.price_per_token.to_string().green(),
        property.status
    );

    banner("Fundraising");
    let investors: Vec<AccountId> = ["alice", "bob", "carol"]
        .iter()
        .map(|name| AccountId::new(*name))
        .collect();
    for investor in &investors {
        registry.bank_mut().deposit(investor, 400_000_000_000);
    }
    for (investor, amount) in investors.iter().zip([
        300_000_000_000u64,
        250_000_000_000,
        100_000_000_000,
    ]) {
        let tokens = registry.invest(investor, property_id, amount)?;
        let property = registry.property(property_id)?;
        println!(
            "  {} bought {} tokens -> raised {} ({})",
            investor,
            tokens.to_string().green(),
            property.raised_amount,
            property.status
        );
    }

    banner("Rental income and expenses");
    registry.bank_mut().deposit(&manager, 50_000_000_000);
    let net = registry.record_rental_income(&manager, property_id, 12_000_000_000)?;
    println!("  recorded 12_000_000_000 gross, {} net of management fee", net);
    registry.record_expense(&manager, property_id, 900_000_000, "elevator overhaul")?;
    let finances = registry.finances(property_id)?;
    println!("  pending distribution pool: {}", finances.pending_distribution.to_string().green());

    banner("Distribution and claims");
    registry.distribute(&manager, property_id, 1)?;
    let record = registry.distribution(property_id, 1)?;
    println!(
        "  round 1: {} over {} tokens -> {} per token",
        record.total_income, record.total_eligible_tokens, record.income_per_token
    );
    for investor in &investors {
        let dividend = registry.claim(investor, property_id, 1)?;
        println!("  {} claimed {}", investor, dividend.to_string().green());
    }
    let record = registry.distribution(property_id, 1)?;
    println!(
        "  claimed {} of {} (dust: {})",
        record.claimed_amount,
        record.total_income,
        record.total_income - record.claimed_amount
    );

    banner("Revaluation");
    registry.update_valuation(&manager, property_id, 1_150_000_000_000)?;
    println!(
        "  token value now {}",
        registry.token_value(property_id)?.to_string().green()
    );

    banner("Platform stats");
    let stats = registry.platform_stats();
    println!(
        "  {} properties | raised {} | distributed {}",
        stats.property_count, stats.total_raised, stats.total_distributed
    );

    Ok(())
}
