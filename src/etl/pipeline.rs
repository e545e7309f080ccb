//! Streaming pipeline composition for ETL operations

use super::{Extractor, Loader, Scope, Transformer};
use eyre::Result;
use std::fmt;

/// ETL Pipeline that streams records from an extractor through a transformer
/// into a loader
///
/// Records are pulled one at a time, so at most one record is in flight.
/// The extractor is opened first and the loader inside it; both are closed
/// in reverse order on every exit path. A pipeline runs once: [`Pipeline::run`]
/// consumes it.
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```
/// use etl_runner::etl::{Extractor, IdentityTransformer, Loader, Pipeline, Records, Resource};
/// use eyre::Result;
///
/// struct Numbers;
/// impl Resource for Numbers {}
/// impl Extractor for Numbers {
///     type Item = i32;
///     fn extract(&mut self) -> Result<Records<'_, i32>> {
///         Ok(Box::new((1..=3).map(Ok)))
///     }
/// }
///
/// struct Discard;
/// impl Resource for Discard {}
/// impl Loader for Discard {
///     type Item = i32;
///     fn load(&mut self, _item: i32) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let pipeline = Pipeline::new(Numbers, IdentityTransformer::new(), Discard);
/// assert_eq!(pipeline.run().unwrap(), 3);
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    limit: Option<usize>,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            limit: None,
        }
    }

    /// Stop after `limit` records; the remaining source is left unread
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Run the complete ETL pipeline
    ///
    /// Returns the number of records delivered to the loader
    ///
    /// # Errors
    /// Returns the first error raised by any stage, after both the loader and
    /// the extractor have been closed.
    pub fn run(mut self) -> Result<usize> {
        log::info!("Starting ETL pipeline");

        let mut extractor = Scope::open("extractor", &mut self.extractor)?;
        let loaded = Scope::open("loader", &mut self.loader).and_then(|mut loader| {
            let streamed = stream(&mut *extractor, &self.transformer, &mut *loader, self.limit);
            loader.release(streamed)
        });
        let count = extractor.release(loaded)?;

        log::info!("Loaded {} records", count);
        Ok(count)
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Transform => write!(f, "transform"),
            Self::Load => write!(f, "load"),
        }
    }
}

fn failed(step: Step, index: usize, err: &eyre::Report) {
    log::error!(
        "Pipeline failed in {} stage at record {}: {:#}",
        step,
        index,
        err
    );
}

fn stream<E, T, L>(
    extractor: &mut E,
    transformer: &T,
    loader: &mut L,
    limit: Option<usize>,
) -> Result<usize>
where
    E: Extractor + ?Sized,
    T: Transformer<Input = E::Item> + ?Sized,
    L: Loader<Item = T::Output> + ?Sized,
{
    let records = extractor
        .extract()
        .inspect_err(|e| failed(Step::Extract, 0, e))?;

    let mut count = 0;
    for (index, record) in records.take(limit.unwrap_or(usize::MAX)).enumerate() {
        let record = record.inspect_err(|e| failed(Step::Extract, index, e))?;
        let output = transformer
            .transform(record)
            .inspect_err(|e| failed(Step::Transform, index, e))?;
        loader
            .load(output)
            .inspect_err(|e| failed(Step::Load, index, e))?;
        log::debug!("Loaded record {}", index);
        count += 1;
    }

    if limit == Some(count) {
        log::info!("Record limit of {} reached, stopping extraction", count);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::{IdentityTransformer, Records, Resource};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<String>>>;

    struct ScriptedExtractor {
        items: Vec<&'static str>,
        fail_at: Option<usize>,
        events: Events,
    }

    impl Resource for ScriptedExtractor {
        fn open(&mut self) -> Result<()> {
            self.events.borrow_mut().push("extractor.open".into());
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.events.borrow_mut().push("extractor.close".into());
            Ok(())
        }
    }

    impl Extractor for ScriptedExtractor {
        type Item = String;

        fn extract(&mut self) -> Result<Records<'_, String>> {
            let fail_at = self.fail_at;
            Ok(Box::new(self.items.iter().enumerate().map(
                move |(i, item)| match fail_at {
                    Some(at) if at == i => Err(eyre::eyre!("read failed at {}", i)),
                    _ => Ok(item.to_string()),
                },
            )))
        }
    }

    struct CapturingLoader {
        fail_open: bool,
        events: Events,
    }

    impl Resource for CapturingLoader {
        fn open(&mut self) -> Result<()> {
            self.events.borrow_mut().push("loader.open".into());
            if self.fail_open {
                eyre::bail!("destination unavailable");
            }
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.events.borrow_mut().push("loader.close".into());
            Ok(())
        }
    }

    impl Loader for CapturingLoader {
        type Item = String;

        fn load(&mut self, item: String) -> Result<()> {
            self.events.borrow_mut().push(format!("load:{}", item));
            Ok(())
        }
    }

    struct RejectTransformer(&'static str);

    impl Transformer for RejectTransformer {
        type Input = String;
        type Output = String;

        fn transform(&self, input: String) -> Result<String> {
            if input == self.0 {
                eyre::bail!("rejected {}", input);
            }
            Ok(input)
        }
    }

    fn pipeline(
        items: Vec<&'static str>,
        fail_at: Option<usize>,
        fail_open: bool,
        events: &Events,
    ) -> Pipeline<ScriptedExtractor, IdentityTransformer<String>, CapturingLoader> {
        Pipeline::new(
            ScriptedExtractor {
                items,
                fail_at,
                events: events.clone(),
            },
            IdentityTransformer::new(),
            CapturingLoader {
                fail_open,
                events: events.clone(),
            },
        )
    }

    fn count(events: &Events, name: &str) -> usize {
        events.borrow().iter().filter(|e| *e == name).count()
    }

    #[test]
    fn test_records_arrive_in_order() {
        let events = Events::default();
        let count = pipeline(vec!["a", "b", "c"], None, false, &events)
            .run()
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            *events.borrow(),
            vec![
                "extractor.open",
                "loader.open",
                "load:a",
                "load:b",
                "load:c",
                "loader.close",
                "extractor.close",
            ]
        );
    }

    #[test]
    fn test_extract_failure_closes_both() {
        let events = Events::default();
        let err = pipeline(vec!["a", "b", "c", "d"], Some(2), false, &events)
            .run()
            .unwrap_err();

        assert_eq!(err.to_string(), "read failed at 2");
        assert_eq!(count(&events, "load:a"), 1);
        assert_eq!(count(&events, "load:b"), 1);
        assert_eq!(count(&events, "load:c"), 0);
        assert_eq!(count(&events, "loader.close"), 1);
        assert_eq!(count(&events, "extractor.close"), 1);
    }

    #[test]
    fn test_empty_pipeline() {
        let events = Events::default();
        let count = pipeline(vec![], None, false, &events).run().unwrap();

        assert_eq!(count, 0);
        assert_eq!(
            *events.borrow(),
            vec![
                "extractor.open",
                "loader.open",
                "loader.close",
                "extractor.close"
            ]
        );
    }

    #[test]
    fn test_limit_stops_early_and_closes() {
        let events = Events::default();
        let count = pipeline(vec!["a", "b", "c"], None, false, &events)
            .with_limit(Some(2))
            .run()
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(count_loads(&events), 2);
        assert_eq!(events.borrow().last().unwrap(), "extractor.close");
    }

    fn count_loads(events: &Events) -> usize {
        events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("load:"))
            .count()
    }

    #[test]
    fn test_loader_open_failure_closes_extractor() {
        let events = Events::default();
        let err = pipeline(vec!["a"], None, true, &events).run().unwrap_err();

        assert_eq!(err.to_string(), "destination unavailable");
        assert_eq!(count_loads(&events), 0);
        assert_eq!(count(&events, "extractor.close"), 1);
        assert_eq!(count(&events, "loader.close"), 1);
    }

    #[test]
    fn test_transform_failure_keeps_prior_loads() {
        let events = Events::default();
        let pipeline = Pipeline::new(
            ScriptedExtractor {
                items: vec!["a", "bad", "c"],
                fail_at: None,
                events: events.clone(),
            },
            RejectTransformer("bad"),
            CapturingLoader {
                fail_open: false,
                events: events.clone(),
            },
        );

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.to_string(), "rejected bad");
        assert_eq!(count_loads(&events), 1);
        assert_eq!(count(&events, "loader.close"), 1);
        assert_eq!(count(&events, "extractor.close"), 1);
    }
}
