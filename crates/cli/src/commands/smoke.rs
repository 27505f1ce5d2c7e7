use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::CommandResult;
use shelf_core::config::{AppConfig, LoadOptions};
use shelf_core::domain::product::{ProductDraft, ProductId};
use shelf_store::{demo_products, CatalogStore, InMemoryCatalog};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run(base_url: Option<&str>) -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, _config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
        }
    }

    checks.push(seed_integrity_check());

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "catalog_exercise",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("http_probe", "skipped due to runtime failure"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    checks.push(catalog_exercise_check(&runtime));

    match base_url {
        Some(base_url) => checks.push(http_probe_check(&runtime, base_url)),
        None => checks.push(skipped("http_probe", "no base URL provided")),
    }

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

fn seed_integrity_check() -> SmokeCheck {
    let started = Instant::now();
    let now = Utc::now();
    let products = demo_products(now);

    let expected_ids: Vec<i64> = (1..=4).collect();
    let ids: Vec<i64> = products.iter().map(|product| product.id.0).collect();
    let timestamps_ok = products.iter().all(|product| product.created_at < now);

    let (status, message) = if ids != expected_ids {
        (SmokeStatus::Fail, format!("seed ids {ids:?} do not match expected {expected_ids:?}"))
    } else if !timestamps_ok {
        (SmokeStatus::Fail, "seed timestamps must predate startup".to_string())
    } else {
        (SmokeStatus::Pass, format!("{} demo products with sequential ids", products.len()))
    };

    SmokeCheck {
        name: "seed_integrity",
        status,
        elapsed_ms: started.elapsed().as_millis() as u64,
        message,
    }
}

/// Runs the full create/get/update/delete cycle against a throwaway seeded
/// catalog.
fn catalog_exercise_check(runtime: &tokio::runtime::Runtime) -> SmokeCheck {
    let started = Instant::now();

    let result = runtime.block_on(async {
        let catalog = InMemoryCatalog::with_products(demo_products(Utc::now()));

        let created = catalog
            .insert(ProductDraft {
                name: "Webcam".to_string(),
                description: "HD".to_string(),
                price: Decimal::new(4999, 2),
            })
            .await;
        if created.id != ProductId(5) {
            return Err(format!("expected created id 5, got {}", created.id));
        }

        catalog
            .find_by_id(created.id)
            .await
            .ok_or_else(|| "created product is not retrievable".to_string())?;

        let updated = catalog
            .update_fields(
                created.id,
                ProductDraft {
                    name: "Webcam Pro".to_string(),
                    description: "Full HD".to_string(),
                    price: Decimal::new(5999, 2),
                },
            )
            .await
            .map_err(|error| error.to_string())?;
        if updated.created_at != created.created_at {
            return Err("update must not change the creation timestamp".to_string());
        }

        catalog.remove(created.id).await.map_err(|error| error.to_string())?;
        if catalog.find_by_id(created.id).await.is_some() {
            return Err("removed product is still retrievable".to_string());
        }

        Ok(catalog.list().await.len())
    });

    match result {
        Ok(remaining) => SmokeCheck {
            name: "catalog_exercise",
            status: SmokeStatus::Pass,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message: format!("create/get/update/delete cycle passed; {remaining} products remain"),
        },
        Err(message) => SmokeCheck {
            name: "catalog_exercise",
            status: SmokeStatus::Fail,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message,
        },
    }
}

/// Probes a running server: the health endpoint and the product listing.
fn http_probe_check(runtime: &tokio::runtime::Runtime, base_url: &str) -> SmokeCheck {
    let started = Instant::now();
    let base_url = base_url.trim_end_matches('/').to_string();

    let result = runtime.block_on(async {
        let client = reqwest::Client::new();

        let health = client
            .get(format!("{base_url}/health"))
            .send()
            .await
            .map_err(|error| format!("GET /health failed: {error}"))?;
        if !health.status().is_success() {
            return Err(format!("GET /health returned {}", health.status()));
        }

        let products = client
            .get(format!("{base_url}/products"))
            .send()
            .await
            .map_err(|error| format!("GET /products failed: {error}"))?;
        if !products.status().is_success() {
            return Err(format!("GET /products returned {}", products.status()));
        }

        let body: serde_json::Value =
            products.json().await.map_err(|error| format!("GET /products body: {error}"))?;
        let listing = body
            .as_array()
            .ok_or_else(|| "GET /products did not return a JSON array".to_string())?;

        Ok(listing.len())
    });

    match result {
        Ok(count) => SmokeCheck {
            name: "http_probe",
            status: SmokeStatus::Pass,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message: format!("server at `{base_url}` is serving {count} products"),
        },
        Err(message) => SmokeCheck {
            name: "http_probe",
            status: SmokeStatus::Fail,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message,
        },
    }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str, message: &str) -> SmokeCheck {
    SmokeCheck { name, status: SmokeStatus::Skipped, elapsed_ms: 0, message: message.to_string() }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
