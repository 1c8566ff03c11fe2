use anyhow::Result;

use super::cleaning::{CleanOptions, clean};
use super::dataset::Dataset;
use super::parser::CsvParser;

pub type Subscriber = Box<dyn FnMut(&Dataset)>;

/// Owns the current dataset. Every change replaces it wholesale and then
/// notifies the subscribers in registration order.
pub struct DatasetStore {
    dataset: Dataset,
    subscribers: Vec<(&'static str, Subscriber)>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            dataset: Dataset::default(),
            subscribers: Vec::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Registers a view and brings it up to date with the current dataset.
    pub fn subscribe(&mut self, name: &'static str, mut subscriber: Subscriber) {
        subscriber(&self.dataset);
        self.subscribers.push((name, subscriber));
    }

    pub fn replace(&mut self, dataset: Dataset) {
        log::info!(
            "dataset '{}' replaced: {} rows, {} columns",
            dataset.name,
            dataset.num_rows(),
            dataset.num_cols()
        );
        self.dataset = dataset;
        self.refresh();
    }

    /// Re-runs every subscriber against the current dataset.
    pub fn refresh(&mut self) {
        for (name, subscriber) in &mut self.subscribers {
            log::debug!("notifying {}", name);
            subscriber(&self.dataset);
        }
    }

    /// Parses a delimited payload and makes it the current dataset.
    pub fn load_text(&mut self, text: &str, name: &str, delimiter: Option<u8>) -> Result<()> {
        let records = CsvParser::parse_records(text, delimiter)?;
        self.replace(Dataset::from_records(name, records));
        Ok(())
    }

    /// Runs a cleaning pass over the current dataset. Subscribers are notified
    /// even when no option is enabled.
    pub fn clean(&mut self, options: CleanOptions) {
        let cleaned = clean(&self.dataset, options);
        self.replace(cleaned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::value::Scalar;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribers_notified_in_order() -> Result<()> {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut store = DatasetStore::new();

        for tag in ["preview", "insights"] {
            let log = Rc::clone(&log);
            store.subscribe(
                tag,
                Box::new(move |ds: &Dataset| log.borrow_mut().push(format!("{}:{}", tag, ds.num_rows()))),
            );
        }
        store.load_text("a,b\n1,2\n3,4", "two", None)?;

        assert_eq!(
            *log.borrow(),
            vec!["preview:0", "insights:0", "preview:2", "insights:2"]
        );
        Ok(())
    }

    #[test]
    fn test_clean_without_options_still_notifies() -> Result<()> {
        let count = Rc::new(RefCell::new(0));
        let mut store = DatasetStore::new();
        store.load_text("a,b\nx,1", "t", None)?;
        {
            let count = Rc::clone(&count);
            store.subscribe("counter", Box::new(move |_: &Dataset| *count.borrow_mut() += 1));
        }
        store.clean(CleanOptions::default());

        assert_eq!(*count.borrow(), 2);
        assert_eq!(store.dataset().rows, vec![vec![Scalar::Text("x".into()), Scalar::Number(1.0)]]);
        Ok(())
    }

    #[test]
    fn test_load_replaces_previous() -> Result<()> {
        let mut store = DatasetStore::new();
        assert_eq!(store.dataset().name, "Untitled");
        store.load_text("a\n1", "first", None)?;
        store.load_text("b,c\n\n2,3\n", "second", None)?;

        let ds = store.dataset();
        assert_eq!(ds.name, "second");
        assert_eq!(ds.columns, vec!["b", "c"]);
        assert_eq!(ds.num_rows(), 1);
        Ok(())
    }
}
