// Run state of the long-lived animation engines. Disposal is the
// handle's job, see `EngineHandle::dispose`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl Lifecycle {
    /// Idle/Stopped → Running. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        match self {
            Lifecycle::Idle | Lifecycle::Stopped => {
                *self = Lifecycle::Running;
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) -> bool {
        if *self == Lifecycle::Running {
            *self = Lifecycle::Stopped;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        *self == Lifecycle::Running
    }
}
