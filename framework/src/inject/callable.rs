//! Callable adaptation
//!
//! Factory functions registered as components are injected through the
//! [`Callable`] trait: the engine resolves each declared parameter, invokes
//! the callable, and keeps the produced instance. [`Factory`] is the
//! canonical type-erased form a registration surface stores; closures of
//! arity 0–4 adapt automatically through [`IntoCallable`] as long as every
//! parameter is an `Arc`-held dependency and the return type is an `Arc`-held
//! instance or `()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::Factory;
//! use std::sync::Arc;
//!
//! let factory = Factory::from_fn(|service: Arc<GreetingService>| service);
//! let instance = injector.inject_func(&factory)?;
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::reflect::{Injectable, ParamDescriptor};
use crate::registry::Instance;

/// A callable with declared, resolvable parameters.
pub trait Callable: Send + Sync {
    /// Declared parameters in call order.
    fn params(&self) -> Vec<ParamDescriptor>;

    /// Invoke with resolved arguments; `None` when the callable produces no
    /// result or an argument did not match its declared type.
    fn call(&self, args: Vec<Instance>) -> Option<Instance>;
}

/// The canonical type-erased factory component.
///
/// Registration surfaces hold components as `Any`; wrapping a closure in a
/// [`Factory`] is what marks it as callable for
/// [`Injector::inject_func`](crate::Injector::inject_func).
pub struct Factory {
    callable: Box<dyn Callable>,
}

impl Factory {
    /// Wrap an already-adapted callable.
    pub fn new(callable: impl Callable + 'static) -> Self {
        Self {
            callable: Box::new(callable),
        }
    }

    /// Wrap a closure whose parameters are injectable dependencies.
    pub fn from_fn<F, Args>(function: F) -> Self
    where
        F: IntoCallable<Args>,
    {
        Self {
            callable: function.into_callable(),
        }
    }
}

impl Callable for Factory {
    fn params(&self) -> Vec<ParamDescriptor> {
        self.callable.params()
    }

    fn call(&self, args: Vec<Instance>) -> Option<Instance> {
        self.callable.call(args)
    }
}

/// A parameter type a callable can declare.
pub trait Dependency: Sized + Send + Sync + 'static {
    /// Descriptor driving resolution of this parameter.
    fn descriptor() -> ParamDescriptor;

    /// Recover the typed value from a resolved instance.
    fn from_instance(instance: Instance) -> Option<Self>;
}

impl<T> Dependency for Arc<T>
where
    T: Injectable + Default,
{
    fn descriptor() -> ParamDescriptor {
        ParamDescriptor::of::<T>()
    }

    fn from_instance(instance: Instance) -> Option<Self> {
        instance.downcast::<T>().ok()
    }
}

/// Return channel of an injected callable.
pub trait FuncResult {
    /// The produced instance, if the callable produces one.
    fn into_instance(self) -> Option<Instance>;
}

impl FuncResult for () {
    fn into_instance(self) -> Option<Instance> {
        None
    }
}

impl<T: Any + Send + Sync> FuncResult for Arc<T> {
    fn into_instance(self) -> Option<Instance> {
        Some(self as Instance)
    }
}

/// Conversion of a plain closure into a [`Callable`].
///
/// `Args` is the parameter-list marker that picks the arity adapter; it is
/// inferred from the closure's signature.
pub trait IntoCallable<Args>: Send + Sync + 'static {
    /// Adapt the closure.
    fn into_callable(self) -> Box<dyn Callable>;
}

struct FnCallable<F, Args> {
    function: F,
    marker: PhantomData<fn() -> Args>,
}

macro_rules! impl_callable {
    ($($param:ident),*) => {
        impl<F, R, $($param),*> Callable for FnCallable<F, ($($param,)*)>
        where
            F: Fn($($param),*) -> R + Send + Sync,
            R: FuncResult,
            $($param: Dependency,)*
        {
            fn params(&self) -> Vec<ParamDescriptor> {
                vec![$($param::descriptor()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, args: Vec<Instance>) -> Option<Instance> {
                let mut args = args.into_iter();
                $(
                    let $param = args.next().and_then($param::from_instance)?;
                )*
                (self.function)($($param),*).into_instance()
            }
        }

        impl<F, R, $($param),*> IntoCallable<($($param,)*)> for F
        where
            F: Fn($($param),*) -> R + Send + Sync + 'static,
            R: FuncResult + 'static,
            $($param: Dependency,)*
        {
            fn into_callable(self) -> Box<dyn Callable> {
                Box::new(FnCallable::<F, ($($param,)*)> {
                    function: self,
                    marker: PhantomData,
                })
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
