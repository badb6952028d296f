use std::borrow::Cow;
use std::sync::Arc;

use super::Bind;
use crate::constants::PAYLOAD_PARAM;
use crate::errors::StepResult;
use crate::model::{Kind, Value};

/// Una entrada del descriptor de binding de un step: nombre del campo a leer
/// del payload y, opcionalmente, el kind esperado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: Cow<'static, str>,
    expected: Option<Kind>,
}

impl Param {
    /// Parámetro sin comprobación de tipo.
    pub const fn any(name: &'static str) -> Self {
        Self { name: Cow::Borrowed(name),
               expected: None }
    }

    /// Parámetro con kind esperado.
    pub const fn typed(name: &'static str, kind: Kind) -> Self {
        Self { name: Cow::Borrowed(name),
               expected: Some(kind) }
    }

    pub fn new(name: impl Into<Cow<'static, str>>, expected: Option<Kind>) -> Self {
        Self { name: name.into(),
               expected }
    }

    /// Deriva el kind esperado del tipo Rust con el que se va a extraer.
    pub fn of<T: Bind>(name: &'static str) -> Self {
        Self::new(name, T::expected())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected(&self) -> Option<Kind> {
        self.expected
    }

    /// `true` para el parámetro reservado `payload`.
    pub fn is_payload(&self) -> bool {
        self.name == PAYLOAD_PARAM
    }
}

/// Argumentos posicionales entregados a `Step::invoke`, en el orden del
/// descriptor (o un único valor en modo simple).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn single(value: Value) -> Self {
        Self(vec![value])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl IntoIterator for Args {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Unidad de trabajo encadenable en una `Sequence`.
///
/// En lugar de inspeccionar la firma en tiempo de ejecución, cada step
/// declara explícitamente sus parámetros (`params`). Con un `Payload` como
/// valor en curso el motor resuelve cada parámetro por nombre; con cualquier
/// otro valor lo pasa tal cual como único argumento.
///
/// `invoke` devuelve `Value::Null` para indicar "no devolvió nada".
pub trait Step: Send + Sync {
    /// Nombre para logs y mensajes de error.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Descriptor de binding, en orden.
    fn params(&self) -> &[Param];

    /// Ejecuta el step con los argumentos ya resueltos.
    fn invoke(&self, args: Args) -> StepResult;
}

impl<S: Step + ?Sized> Step for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn params(&self) -> &[Param] {
        (**self).params()
    }

    fn invoke(&self, args: Args) -> StepResult {
        (**self).invoke(args)
    }
}

impl<S: Step + ?Sized> Step for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn params(&self) -> &[Param] {
        (**self).params()
    }

    fn invoke(&self, args: Args) -> StepResult {
        (**self).invoke(args)
    }
}
