//! Mock platform shared by the integration tests
//!
//! The counter is simulated: it only moves when a test advances it (or, with
//! `set_step`, by a fixed amount on every read). `run_for` delivers compare
//! interrupts at the exact counter values they would fire at.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

use log::{LevelFilter, Log, Metadata, Record};
use shared::{CoreId, TaskHandle, TaskStatus};
use timer::{CounterHardware, InterruptController, IrqHandler, Scheduler, Timer, TimerConfig};

pub type MockTimer = Timer<MockCounter, MockScheduler>;

/// Simulated counter/compare peripheral
#[derive(Default)]
pub struct MockCounter {
    counter: AtomicU64,
    frequency: AtomicU32,
    step: AtomicU64,
    /// Absolute counter value the compare fires at
    compare: AtomicU64,
    enabled: AtomicBool,
    arm_calls: AtomicUsize,
    last_interval: AtomicU64,
}

impl MockCounter {
    pub fn new(frequency: u32) -> Self {
        let hw = Self::default();
        hw.frequency.store(frequency, Ordering::SeqCst);
        hw
    }

    pub fn set_frequency(&self, frequency: u32) {
        self.frequency.store(frequency, Ordering::SeqCst);
    }

    pub fn set_counter(&self, value: u64) {
        self.counter.store(value, Ordering::SeqCst);
    }

    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn advance(&self, ticks: u64) {
        self.counter.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Counter ticks that pass on every `read_counter`
    pub fn set_step(&self, step: u64) {
        self.step.store(step, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn compare(&self) -> u64 {
        self.compare.load(Ordering::SeqCst)
    }

    pub fn arm_calls(&self) -> usize {
        self.arm_calls.load(Ordering::SeqCst)
    }

    pub fn last_interval(&self) -> u64 {
        self.last_interval.load(Ordering::SeqCst)
    }

    /// Whether the compare interrupt is pending right now
    pub fn is_firing(&self) -> bool {
        self.is_enabled() && self.counter() >= self.compare()
    }
}

impl CounterHardware for MockCounter {
    fn read_counter(&self) -> u64 {
        let step = self.step.load(Ordering::SeqCst);
        self.counter.fetch_add(step, Ordering::SeqCst)
    }

    fn read_frequency(&self) -> u32 {
        self.frequency.load(Ordering::SeqCst)
    }

    fn arm_compare(&self, interval: u64) {
        self.arm_calls.fetch_add(1, Ordering::SeqCst);
        self.last_interval.store(interval, Ordering::SeqCst);
        self.compare
            .store(self.counter() + interval, Ordering::SeqCst);
    }

    fn enable_interrupt(&self, enable: bool) {
        self.enabled.store(enable, Ordering::SeqCst);
    }
}

/// Advance the counter by `hw_ticks`, delivering every compare interrupt
/// that falls inside the span. Returns the number of interrupts delivered.
pub fn run_for(timer: &MockTimer, hw_ticks: u64) -> u64 {
    let hw = timer.hardware();
    let end = hw.counter() + hw_ticks;
    let mut fired = 0;

    loop {
        let compare = hw.compare();
        if hw.is_enabled() && compare <= end {
            hw.set_counter(compare.max(hw.counter()));
            timer.handle_interrupt();
            fired += 1;
        } else {
            hw.set_counter(end);
            return fired;
        }
    }
}

/// Scheduler stand-in recording the calls the timer makes
pub struct MockScheduler {
    core: AtomicU32,
    status: Mutex<TaskStatus>,
    reschedules: AtomicUsize,
    drains: AtomicUsize,
    on_drain: OnceLock<Box<dyn Fn() + Send + Sync>>,
}

impl MockScheduler {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            core: AtomicU32::new(0),
            status: Mutex::new(status),
            reschedules: AtomicUsize::new(0),
            drains: AtomicUsize::new(0),
            on_drain: OnceLock::new(),
        }
    }

    pub fn set_core(&self, core: u32) {
        self.core.store(core, Ordering::SeqCst);
    }

    pub fn set_status(&self, status: TaskStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn reschedules(&self) -> usize {
        self.reschedules.load(Ordering::SeqCst)
    }

    pub fn drains(&self) -> usize {
        self.drains.load(Ordering::SeqCst)
    }

    /// Run `f` on every work-queue drain, e.g. to let simulated time pass
    pub fn on_drain(&self, f: impl Fn() + Send + Sync + 'static) {
        let _ = self.on_drain.set(Box::new(f));
    }
}

impl Scheduler for MockScheduler {
    fn current_core(&self) -> CoreId {
        CoreId(self.core.load(Ordering::SeqCst))
    }

    fn current_task(&self) -> TaskHandle {
        TaskHandle(1)
    }

    fn task_status(&self, _task: TaskHandle) -> TaskStatus {
        *self.status.lock().unwrap()
    }

    fn reschedule(&self) {
        self.reschedules.fetch_add(1, Ordering::SeqCst);
    }

    fn drain_workqueues(&self) {
        self.drains.fetch_add(1, Ordering::SeqCst);
        if let Some(f) = self.on_drain.get() {
            f();
        }
    }
}

/// Interrupt controller remembering the installed handler
#[derive(Default)]
pub struct MockIrq {
    installed: Mutex<Vec<(u32, &'static dyn IrqHandler)>>,
}

impl MockIrq {
    pub fn vectors(&self) -> Vec<u32> {
        self.installed.lock().unwrap().iter().map(|(v, _)| *v).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.lock().unwrap().is_empty()
    }

    /// Dispatch `vector` the way the interrupt controller would
    pub fn fire(&self, vector: u32) {
        let handler = self
            .installed
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(v, _)| *v == vector)
            .map(|(_, h)| *h);
        if let Some(handler) = handler {
            handler.handle_irq();
        }
    }
}

impl InterruptController for MockIrq {
    fn install_handler(&self, vector: u32, handler: &'static dyn IrqHandler) {
        self.installed.lock().unwrap().push((vector, handler));
    }
}

pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Build a timer for a normal (non-idle) task on core 0
pub fn mock_timer(frequency: u32, config: TimerConfig) -> &'static MockTimer {
    leak(Timer::new(
        MockCounter::new(frequency),
        MockScheduler::new(TaskStatus::Running),
        config,
    ))
}

/// Build and initialize a timer on core 0
pub fn started_timer(frequency: u32, config: TimerConfig) -> &'static MockTimer {
    let timer = mock_timer(frequency, config);
    timer.init(&MockIrq::default()).expect("timer init");
    timer
}

// Log capture. Records are kept per thread so parallel tests don't mix.

thread_local! {
    static RECORDS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = format!("{}", record.args());
        RECORDS.with(|records| records.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

pub fn capture_logs() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    RECORDS.with(|records| records.borrow_mut().clear());
}

pub fn take_logs() -> Vec<String> {
    RECORDS.with(|records| records.borrow_mut().drain(..).collect())
}

/// Seconds reported by heartbeat lines
pub fn heartbeats(logs: &[String]) -> u64 {
    logs.iter()
        .filter_map(|line| {
            if line.starts_with("One second has passed") {
                Some(1)
            } else {
                line.split_once(" seconds have passed")
                    .and_then(|(n, _)| n.parse().ok())
            }
        })
        .sum()
}
