//! Python bindings over integer-keyed networks.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{NaiveDate, NaiveDateTime};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::NetworkConfig;
use crate::models::Activity;
use crate::network::Network;

type Triple = (i64, i64, i64);

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Activity-on-arc network with integer events and durations.
#[pyclass(name = "Network")]
#[derive(Clone, Debug, Default)]
pub struct PyNetwork {
    inner: Network<i64, i64>,
}

#[pymethods]
impl PyNetwork {
    #[new]
    #[pyo3(signature = (verbosity=0, path_limit=None))]
    fn new(verbosity: u8, path_limit: Option<usize>) -> Self {
        Self {
            inner: Network::with_config(NetworkConfig {
                verbosity,
                path_limit,
            }),
        }
    }

    /// Parse the text format (initial time, terminal time, activity lines).
    #[staticmethod]
    fn from_txt(text: &str) -> PyResult<Self> {
        Network::from_txt(text)
            .map(|inner| Self { inner })
            .map_err(value_error)
    }

    fn to_txt(&self) -> PyResult<String> {
        self.inner.to_txt().map_err(value_error)
    }

    /// Raises ValueError if the activity, its reverse, or a self-loop is rejected.
    fn add_activity(&mut self, trigger: i64, completion: i64, duration: i64) -> PyResult<()> {
        self.inner
            .add_activity(trigger, completion, duration)
            .map(|_| ())
            .map_err(value_error)
    }

    fn delete_activity(&mut self, trigger: i64, completion: i64) -> Option<i64> {
        self.inner.delete_activity(trigger, completion)
    }

    fn estimated_duration(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .estimated_duration(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn set_estimated_duration(
        &mut self,
        trigger: i64,
        completion: i64,
        duration: i64,
    ) -> PyResult<Option<i64>> {
        self.inner
            .set_estimated_duration(Activity::new(trigger, completion), duration)
            .map_err(value_error)
    }

    fn schedule(&mut self, initial_time: i64, terminal_time: i64) {
        self.inner.schedule(initial_time, terminal_time);
    }

    #[getter]
    fn initial_time(&self) -> Option<i64> {
        self.inner.initial_time()
    }

    #[getter]
    fn terminal_time(&self) -> Option<i64> {
        self.inner.terminal_time()
    }

    fn activities(&self) -> Vec<Triple> {
        self.inner
            .segments()
            .map(|s| (s.activity.trigger, s.activity.completion, s.duration))
            .collect()
    }

    fn initial_events(&self) -> Vec<i64> {
        self.inner.initial_events().into_iter().collect()
    }

    fn terminal_events(&self) -> Vec<i64> {
        self.inner.terminal_events().into_iter().collect()
    }

    fn is_well_formed(&self) -> bool {
        self.inner.is_well_formed()
    }

    fn earliest_occurence(&self, event: i64) -> PyResult<i64> {
        self.inner.earliest_occurence(&event).map_err(value_error)
    }

    fn latest_occurence(&self, event: i64) -> PyResult<i64> {
        self.inner.latest_occurence(&event).map_err(value_error)
    }

    fn earliest_finish(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .earliest_finish(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn latest_start(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .latest_start(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn activity_float(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .activity_float(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn free_float(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .free_float(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn interfering_float(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .interfering_float(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    fn independent_float(&self, trigger: i64, completion: i64) -> PyResult<i64> {
        self.inner
            .independent_float(&Activity::new(trigger, completion))
            .map_err(value_error)
    }

    /// Critical activities as (trigger, completion, duration), plus the project length.
    fn find_critical_path(&self) -> PyResult<(Vec<Triple>, i64)> {
        let critical = self.inner.find_critical_path().map_err(value_error)?;
        let segments = critical
            .segments
            .iter()
            .map(|s| (s.activity.trigger, s.activity.completion, s.duration))
            .collect();
        Ok((segments, critical.length))
    }

    fn paths(&self, start: i64, finish: i64) -> PyResult<Vec<Vec<Triple>>> {
        let paths = self.inner.paths(&start, &finish).map_err(value_error)?;
        Ok(paths
            .into_iter()
            .map(|p| {
                p.into_iter()
                    .map(|s| (s.activity.trigger, s.activity.completion, s.duration))
                    .collect()
            })
            .collect())
    }

    fn subnet(&self, start: i64, finish: i64) -> PyResult<Self> {
        self.inner
            .subnet(&start, &finish)
            .map(|inner| Self { inner })
            .map_err(value_error)
    }

    /// Event windows in calendar days from `start`: event -> (earliest, latest).
    fn calendar(&self, start: NaiveDate) -> PyResult<HashMap<i64, (NaiveDateTime, NaiveDateTime)>> {
        let calendar = self.inner.calendar(start).map_err(value_error)?;
        Ok(calendar
            .windows
            .into_iter()
            .map(|(event, w)| (event, (w.earliest, w.latest)))
            .collect())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Network(activities={}, initial_time={:?}, terminal_time={:?})",
            self.inner.len(),
            self.inner.initial_time(),
            self.inner.terminal_time()
        )
    }
}

/// The pert_network Python module.
#[pymodule]
fn pert_network(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNetwork>()?;
    Ok(())
}
