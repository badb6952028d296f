//! Macro para declarar steps a partir de un closure tipado.
//!
//! Exportado en la raíz del crate:
//!   use seq_core::step;
//!
//! ```ignore
//! // Lee `number` (debe ser int) y devuelve number + 1
//! let inc = step!(|number: i64| Ok(number + 1)).named("inc");
//! // Recibe el payload completo y lo muta en sitio
//! let touch = step!(|payload: Payload| {
//!     payload.set("touched", true);
//!     Ok(())
//! });
//! ```
//!
//! El descriptor se construye con `Param::of::<Ty>(nombre)`; cada argumento se
//! convierte con `Bind::from_value` antes de evaluar el cuerpo. El cuerpo es
//! una expresión `Result<T, SequenceError>` con `T: Into<Value>` (`()` se
//! traduce a `Value::Null`, es decir "no devolvió nada").

#[macro_export]
macro_rules! step {
    (|| $body:expr) => {
        $crate::step!(| | $body)
    };
    (|$($param:ident : $ty:ty),* $(,)?| $body:expr) => {
        $crate::step::FnStep::new(
            ::std::vec![$($crate::step::Param::of::<$ty>(::std::stringify!($param))),*],
            move |args: $crate::step::Args| -> $crate::errors::StepResult {
                #[allow(unused_mut, unused_variables)]
                let mut args = args.into_iter();
                $(
                    #[allow(unused_mut)]
                    let mut $param: $ty = <$ty as $crate::step::Bind>::from_value(
                        ::std::stringify!($param),
                        args.next().unwrap_or_default(),
                    )?;
                )*
                let out: ::std::result::Result<_, $crate::errors::SequenceError> = $body;
                out.map(::std::convert::Into::<$crate::model::Value>::into)
            },
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::model::{Payload, Value};
    use crate::step::{Args, Param, Step};
    use crate::errors::SequenceError;
    use crate::model::Kind;

    #[test]
    fn descriptor_follows_closure_signature() {
        let s = step!(|number: i64, payload: Payload, extra: Value| {
            let _ = (&payload, &extra);
            Ok(number)
        });
        assert_eq!(s.params(),
                   &[Param::typed("number", Kind::Int),
                     Param::typed("payload", Kind::Payload),
                     Param::any("extra")]);
    }

    #[test]
    fn body_result_is_converted_into_value() {
        let inc = step!(|number: i64| Ok(number + 1));
        assert_eq!(inc.invoke(Args::single(Value::Int(1))), Ok(Value::Int(2)));

        let nothing = step!(|number: i64| {
            number += 1;
            let _ = number;
            Ok(())
        });
        assert_eq!(nothing.invoke(Args::single(Value::Int(1))), Ok(Value::Null));
    }

    #[test]
    fn conversion_failure_is_a_type_mismatch() {
        let inc = step!(|number: i64| Ok(number + 1));
        assert_eq!(inc.invoke(Args::single(Value::from("one"))),
                   Err(SequenceError::mismatch("number", Kind::String, Kind::Int)));
    }

    #[test]
    fn zero_argument_steps_are_supported() {
        let constant = step!(|| Ok("fixed"));
        assert!(constant.params().is_empty());
        assert_eq!(constant.invoke(Args::default()), Ok(Value::from("fixed")));
    }
}
