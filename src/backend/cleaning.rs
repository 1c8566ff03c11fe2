use super::dataset::Dataset;
use super::value::{Scalar, is_blank, parse_number};

/// Which cleaning steps to run. Enabled steps always run as
/// trim, then drop-empty, then infer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanOptions {
    pub trim: bool,
    pub drop_empty: bool,
    pub infer: bool,
}

/// A single cleaning step, as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CleanStep {
    Trim,
    DropEmpty,
    Infer,
}

impl CleanOptions {
    pub fn from_steps(steps: &[CleanStep]) -> Self {
        let mut options = Self::default();
        for step in steps {
            match step {
                CleanStep::Trim => options.trim = true,
                CleanStep::DropEmpty => options.drop_empty = true,
                CleanStep::Infer => options.infer = true,
            }
        }
        options
    }
}

/// Produces a cleaned copy of `dataset`. With no option enabled the copy is
/// identical to the input.
pub fn clean(dataset: &Dataset, options: CleanOptions) -> Dataset {
    let mut out = dataset.clone();
    if options.trim {
        log::debug!("cleaning {}: trim", out.name);
        out = trim(out);
    }
    if options.drop_empty {
        log::debug!("cleaning {}: drop empty rows", out.name);
        out = drop_empty(out);
    }
    if options.infer {
        log::debug!("cleaning {}: infer numbers", out.name);
        out = infer(out);
    }
    out
}

fn trim(mut dataset: Dataset) -> Dataset {
    for column in &mut dataset.columns {
        *column = column.trim().to_string();
    }
    for cell in dataset.rows.iter_mut().flatten() {
        if let Scalar::Text(s) = cell {
            let trimmed = s.trim().to_string();
            *cell = if trimmed.is_empty() {
                Scalar::Empty
            } else {
                Scalar::Text(trimmed)
            };
        }
    }
    dataset
}

fn drop_empty(mut dataset: Dataset) -> Dataset {
    dataset
        .rows
        .retain(|row| !row.iter().all(|cell| is_blank(Some(cell))));
    dataset
}

fn infer(mut dataset: Dataset) -> Dataset {
    for cell in dataset.rows.iter_mut().flatten() {
        if let Scalar::Text(s) = cell {
            if let Some(n) = parse_number(s.trim()) {
                *cell = Scalar::Number(n);
            }
        }
    }
    dataset
}
