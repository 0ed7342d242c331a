use std::sync::Arc;

/// Уровень приоритета внутри топика.
pub type Priority = u32;

/// Результат одного вызова обработчика.
pub type CallbackResult = anyhow::Result<()>;

/// Обработчик, зарегистрированный на топик.
///
/// Получает аргументы публикации как срез в порядке их передачи. Ошибка,
/// возвращённая обработчиком, прерывает текущую публикацию.
pub type Callback<A> = Arc<dyn Fn(&[A]) -> CallbackResult + Send + Sync>;

/// Упаковывает замыкание в [`Callback`].
///
/// Удобно, когда один и тот же обработчик нужно подписать несколько раз и
/// сравнивать хэндлы по указателю.
pub fn callback<A, F>(f: F) -> Callback<A>
where
    F: Fn(&[A]) -> CallbackResult + Send + Sync + 'static,
{
    Arc::new(f)
}
