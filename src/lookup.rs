use crate::data::{LookupResult, SiteRef};
use crate::dns::{self, DnsSource};
use crate::whois::{self, WhoisSource};
use std::sync::Arc;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

// The maximum number of results that can be in the channel before calls to .send start waiting
// for the receiver to take from the channel.
const CHANSIZE: usize = 32 * 4;

/// Fans every site out into a WHOIS lookup and a DNS lookup and streams back the results as
/// they complete.
pub struct Lookup<W, D> {
    whois: Arc<W>,
    dns: Arc<D>,
    concurrency: usize,
}

impl<W, D> Lookup<W, D>
where
    W: WhoisSource + 'static,
    D: DnsSource + 'static,
{
    pub fn new(whois: W, dns: D) -> Self {
        Lookup {
            whois: Arc::new(whois),
            dns: Arc::new(dns),
            concurrency: 320,
        }
    }

    /// Builder method that sets how many lookups may be in flight at once. A WHOIS query and
    /// the three DNS queries for one host each count as one. `0` removes the limit.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Starts the lookups in the background and returns the receiving half of the results
    /// channel. The channel closes once every lookup has reported.
    ///
    /// Each site yields one WHOIS result and three DNS results, in no particular order.
    pub fn run<I>(self, sites: I) -> Receiver<LookupResult>
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let permits = match self.concurrency {
            0 => Semaphore::MAX_PERMITS,
            n => n,
        };
        let gate = Arc::new(Semaphore::new(permits));
        let (sender, receiver) = channel::<LookupResult>(CHANSIZE);
        let sites = sites.into_iter();

        tokio::spawn(async move {
            let mut total = 0;
            for raw in sites {
                let site = Arc::new(SiteRef::parse(&raw));
                debug!("queued {:?}", site);
                total += 1;

                let Some(permit) = acquire(&gate).await else {
                    break;
                };
                tokio::spawn(whois_task(
                    Arc::clone(&self.whois),
                    Arc::clone(&site),
                    sender.clone(),
                    permit,
                ));

                let Some(permit) = acquire(&gate).await else {
                    break;
                };
                tokio::spawn(dns_task(
                    Arc::clone(&self.dns),
                    site,
                    sender.clone(),
                    permit,
                ));
            }
            info!("started lookups for {} sites", total);
            // Our sender goes away here, the spawned tasks hold the rest.
        });

        receiver
    }
}

async fn acquire(gate: &Arc<Semaphore>) -> Option<OwnedSemaphorePermit> {
    Arc::clone(gate).acquire_owned().await.ok()
}

async fn whois_task<W>(
    source: Arc<W>,
    site: Arc<SiteRef>,
    sender: Sender<LookupResult>,
    _permit: OwnedSemaphorePermit,
) where
    W: WhoisSource + ?Sized,
{
    let report = whois::lookup(source.as_ref(), &site).await;
    if sender.send(LookupResult::Whois(report)).await.is_err() {
        debug!("receiver dropped, discarding whois result for {}", site.host);
    }
}

async fn dns_task<D>(
    source: Arc<D>,
    site: Arc<SiteRef>,
    sender: Sender<LookupResult>,
    _permit: OwnedSemaphorePermit,
) where
    D: DnsSource + ?Sized,
{
    for report in dns::lookup(source.as_ref(), &site).await {
        if sender.send(LookupResult::Dns(report)).await.is_err() {
            debug!("receiver dropped, discarding dns results for {}", site.host);
            return;
        }
    }
}
