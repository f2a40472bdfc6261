//! Pyforge - Python project audit and migration engine
//!
//! Pyforge inspects a Python project tree's declarative configuration
//! (pyproject.toml, lock files, ini-style dotfiles), infers which tooling
//! is in use, scores project health, and rewrites configuration to migrate
//! from legacy tools (poetry, pip, pipenv, setuptools, black, isort,
//! flake8, mypy) to the modern stack (uv, ruff, basedpyright).
//!
//! Entry points:
//! - [`audit::audit_project`] - read-only health audit with recommendations
//! - [`upgrade::create_migration_plan`] - side-effect-free migration preview
//! - [`upgrade::upgrade_project`] - apply migrations with backup and dry-run

pub mod audit;
pub mod cli;
pub mod detectors;
pub mod errors;
pub mod models;
pub mod readers;
pub mod upgrade;
