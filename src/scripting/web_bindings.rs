//! Web-style Binding Registration
//!
//! Installs the script-visible surface on a context:
//!
//! - `jsb.loadRemoteImage(url, function(succeed, image) {})`
//! - `performance.now()`
//!
//! Namespaces are created on the global object if absent and reused if a
//! script (or another binding set) already defined them.

use std::sync::Arc;

use rquickjs::function::{Rest, This};
use rquickjs::{Context, Ctx, Exception, FromJs, Function, Object, Value};

use crate::core::clock;
use crate::core::error::ScriptError;
use crate::core::scheduler::TaskScheduler;
use crate::network::Downloader;
use crate::resources::TextureCache;
use crate::scripting::delegator::DownloadDelegator;

/// Register `jsb` and `performance` bindings on the context.
pub fn register(
    context: &Context,
    cache: TextureCache,
    downloader: Arc<Downloader>,
    scheduler: Arc<TaskScheduler>,
) -> Result<(), ScriptError> {
    let owner = context.clone();

    context
        .with(|ctx| register_in(&ctx, owner, cache, downloader, scheduler))
        .map_err(|e| ScriptError::Binding {
            name: "jsb/performance".to_string(),
            reason: e.to_string(),
        })
}

fn register_in<'js>(
    ctx: &Ctx<'js>,
    owner: Context,
    cache: TextureCache,
    downloader: Arc<Downloader>,
    scheduler: Arc<TaskScheduler>,
) -> rquickjs::Result<()> {
    let globals = ctx.globals();

    // ==================== jsb namespace ====================
    let jsb = get_or_create_namespace(ctx, &globals, "jsb")?;

    // jsb.loadRemoteImage(url, function(succeed, image) {})
    //
    // Argument-shape errors (wrong arity, non-string url) surface as a
    // TypeError before any download starts. A non-callable second argument
    // is tolerated: the download still runs and completion is silently
    // skipped.
    let load_remote_image = Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, this: This<Value<'js>>, args: Rest<Value<'js>>| -> rquickjs::Result<()> {
            if args.0.len() != 2 {
                return Err(Exception::throw_type(
                    &ctx,
                    "loadRemoteImage: wrong number of arguments",
                ));
            }

            let url = match String::from_js(&ctx, args.0[0].clone()) {
                Ok(url) => url,
                Err(_) => {
                    return Err(Exception::throw_type(
                        &ctx,
                        "loadRemoteImage: url is not convertible to a string",
                    ))
                }
            };

            let callback = args.0[1].clone().into_function();
            let receiver = this.0.clone().into_object();

            let delegator = DownloadDelegator::create(
                &ctx,
                owner.clone(),
                receiver,
                callback,
                url,
                cache.clone(),
                Arc::clone(&downloader),
                Arc::clone(&scheduler),
            );
            delegator.download_async();

            Ok(())
        },
    )?;
    jsb.set("loadRemoteImage", load_remote_image)?;

    // ==================== performance namespace ====================
    let performance = get_or_create_namespace(ctx, &globals, "performance")?;

    // performance.now() - milliseconds since the engine epoch
    performance.set(
        "now",
        Function::new(ctx.clone(), || -> f64 { clock::performance_now() })?,
    )?;

    Ok(())
}

/// Fetch an existing namespace object from globals or create it.
fn get_or_create_namespace<'js>(
    ctx: &Ctx<'js>,
    globals: &Object<'js>,
    name: &str,
) -> rquickjs::Result<Object<'js>> {
    if let Ok(existing) = globals.get::<_, Object>(name) {
        return Ok(existing);
    }

    let namespace = Object::new(ctx.clone())?;
    globals.set(name, namespace.clone())?;
    Ok(namespace)
}
