//! Components
//!
//! A component is the runnable object a resolved configuration describes.
//! Component types implement [`Component`] plus [`BuildComponent`], and are
//! bound to registrations through a [`ComponentClass`].

pub mod args;
pub mod error;

pub use args::{ComponentArgs, FromValue};
pub use error::ComponentError;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub trait Component: AsAny + fmt::Debug + Send + Sync {
    /// Entry point for standalone execution
    fn run(&self) -> Result<(), ComponentError> {
        Err(ComponentError::NotRunnable(format!("{:?}", self)))
    }
}

impl dyn Component {
    pub fn downcast_ref<T: Component + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Component + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A component type that can be built from named arguments
pub trait BuildComponent: Component + Sized {
    const NAME: &'static str;

    fn build(args: &mut ComponentArgs) -> Result<Self, ComponentError>;
}

pub type ComponentFactory =
    Arc<dyn Fn(ComponentArgs) -> Result<Arc<dyn Component>, ComponentError> + Send + Sync>;

/// Named component constructor bound to registrations
#[derive(Clone)]
pub struct ComponentClass {
    name: String,
    factory: ComponentFactory,
}

impl ComponentClass {
    /// Class for a [`BuildComponent`] type; leftover arguments are rejected
    pub fn of<C: BuildComponent + 'static>() -> Self {
        Self::new(C::NAME, |mut args| {
            let component = C::build(&mut args)?;
            if !args.is_empty() {
                return Err(ComponentError::UnexpectedArguments {
                    component: C::NAME.to_string(),
                    names: args.remaining(),
                });
            }
            Ok(Arc::new(component) as Arc<dyn Component>)
        })
    }

    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(ComponentArgs) -> Result<Arc<dyn Component>, ComponentError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self, args: ComponentArgs) -> Result<Arc<dyn Component>, ComponentError> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentClass").field(&self.name).finish()
    }
}
